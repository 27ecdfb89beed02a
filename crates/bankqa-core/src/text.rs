use crate::error::{Error, Result};

/// Default chunk length used by [`split_text`] callers.
pub const DEFAULT_CHUNK_LENGTH: usize = 512;

/// Split `text` into consecutive chunks of at most `max_length` characters.
///
/// Lengths are counted in `char`s so multi-byte text is never cut inside a
/// code point. Joining the chunks yields the original string.
pub fn split_text(text: &str, max_length: usize) -> Result<Vec<String>> {
    if max_length == 0 {
        return Err(Error::InvalidInput(
            "chunk length must be greater than zero".to_string(),
        ));
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_length {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    Ok(chunks)
}
