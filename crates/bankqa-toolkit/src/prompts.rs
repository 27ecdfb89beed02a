//! Prompt templates handed to the language model.

pub const QUERY_CHECKER: &str = "
{query}
Double check the {dialect} query above for common mistakes, including:
- Using NOT IN with NULL values
- Using UNION when UNION ALL should have been used
- Using BETWEEN for exclusive ranges
- Data type mismatch in predicates
- Properly quoting identifiers
- Using the correct number of arguments for functions
- Casting to the correct data type
- Using the proper columns for joins

If there are any of the above mistakes, rewrite the query. If there are no mistakes, just reproduce the original query.

Output the final SQL query only.

SQL Query: ";

pub const SQL_PREFIX: &str = "You are an agent designed to interact with a SQL database.
Given an input question, create a syntactically correct {dialect} query to run, then look at the results of the query and return the answer.
Unless the user specifies a specific number of examples they wish to obtain, always limit your query to at most {top_k} results.
You can order the results by a relevant column to return the most interesting examples in the database.
Never query for all the columns from a specific table, only ask for the relevant columns given the question.
You have access to tools for interacting with the database.
Only use the below tools. Only use the information returned by the below tools to construct your final answer.
You MUST double check your query before executing it. If you get an error while executing a query, rewrite the query and try again.

DO NOT make any DML statements (INSERT, UPDATE, DELETE, DROP etc.) to the database.

If the question does not seem related to the database, just return \"I don't know\" as the answer.
";

pub fn render_query_checker(dialect: &str, query: &str) -> String {
    QUERY_CHECKER
        .replace("{dialect}", dialect)
        .replace("{query}", query)
}

pub fn render_sql_prefix(dialect: &str, top_k: usize) -> String {
    SQL_PREFIX
        .replace("{dialect}", dialect)
        .replace("{top_k}", &top_k.to_string())
}
