use std::sync::Arc;

use tracing::{debug, info};

use crate::database::{SqlDatabase, SqlDatabaseOptions};
use crate::errors::ToolkitError;
use crate::llm::LanguageModel;
use crate::prompts::render_sql_prefix;
use crate::toolkit::{SqlDatabaseToolkit, ToolSelection};
use crate::tools::Tool;

/// What the agent does when the model names a tool that does not exist.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsingErrorPolicy {
    /// Surface the error to the caller.
    Raise,
    /// Return a standard observation listing the valid tools.
    Observe,
    /// Return this observation verbatim.
    Message(String),
}

/// Settings forwarded to the external reasoning loop.
#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub verbose: bool,
    pub temperature: f32,
    pub handle_parsing_errors: ParsingErrorPolicy,
    /// Row limit suggested to the model in the system prompt.
    pub top_k: usize,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            temperature: 0.5,
            handle_parsing_errors: ParsingErrorPolicy::Observe,
            top_k: 10,
        }
    }
}

/// Configured SQL agent: a model plus the tools it may call. The reasoning
/// loop that drives it lives outside this crate.
pub struct SqlAgent {
    llm: Arc<dyn LanguageModel>,
    tools: Vec<Box<dyn Tool>>,
    options: AgentOptions,
    system_prompt: String,
}

impl SqlAgent {
    pub fn llm(&self) -> &Arc<dyn LanguageModel> {
        &self.llm
    }

    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn tool(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| &**tool)
    }

    /// Prefix followed by one `name: description` line per tool.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Dispatch a tool call chosen by the reasoning loop.
    pub async fn call_tool(&self, name: &str, input: &str) -> Result<String, ToolkitError> {
        let name = name.trim();
        let Some(tool) = self.tool(name) else {
            let available = self.tool_names().join(", ");
            return match &self.options.handle_parsing_errors {
                ParsingErrorPolicy::Raise => Err(ToolkitError::UnknownTool {
                    name: name.to_string(),
                    available,
                }),
                ParsingErrorPolicy::Observe => Ok(format!(
                    "{name} is not a valid tool, try one of [{available}]."
                )),
                ParsingErrorPolicy::Message(message) => Ok(message.clone()),
            };
        };

        if self.options.verbose {
            info!(tool = %name, input = %input, "tool call");
        } else {
            debug!(tool = %name, "tool call");
        }
        let observation = tool.run(input).await?;
        if self.options.verbose {
            info!(tool = %name, observation = %observation, "tool observation");
        }
        Ok(observation)
    }
}

/// Assemble a SQL agent. Without a toolkit, one exposing all four tools is
/// built over `db_uri` with a single sample row per table.
pub async fn create_sql_agent(
    db_uri: &str,
    toolkit: Option<SqlDatabaseToolkit>,
    llm: Arc<dyn LanguageModel>,
    options: AgentOptions,
) -> Result<SqlAgent, ToolkitError> {
    let toolkit = match toolkit {
        Some(toolkit) => toolkit,
        None => {
            let db = SqlDatabase::from_uri(db_uri, SqlDatabaseOptions::default().with_sample_rows(1))
                .await?;
            SqlDatabaseToolkit::new(Arc::new(db), Arc::clone(&llm), ToolSelection::all())
        }
    };

    let tools = toolkit.get_tools();
    let mut system_prompt = render_sql_prefix(toolkit.dialect(), options.top_k);
    system_prompt.push('\n');
    for tool in &tools {
        system_prompt.push_str(&format!("{}: {}\n", tool.name(), tool.description()));
    }

    info!(
        model = %llm.name(),
        dialect = toolkit.dialect(),
        tools = tools.len(),
        "sql agent created"
    );

    Ok(SqlAgent {
        llm,
        tools,
        options,
        system_prompt,
    })
}
