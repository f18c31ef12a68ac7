//! Local input checks, run before a request is sent.
//!
//! A request that fails here never reaches the network; the caller gets a
//! [`Error::Validation`] with status 400.

use crate::{types::BatchMemoryItem, Error, Result};

/// Maximum memory content length, in characters.
pub const MAX_CONTENT_LENGTH: usize = 50_000;

/// Content must be non-blank and at most [`MAX_CONTENT_LENGTH`] characters.
pub fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::validation("content cannot be empty"));
    }

    let length = content.chars().count();
    if length > MAX_CONTENT_LENGTH {
        return Err(Error::validation(format!(
            "content exceeds maximum length of 50,000 characters (got {})",
            length
        )));
    }

    Ok(())
}

pub fn validate_agent_id(agent_id: &str) -> Result<()> {
    if agent_id.trim().is_empty() {
        return Err(Error::validation("agent_id cannot be empty"));
    }
    Ok(())
}

/// Ids become path segments, so a blank one would address the collection
/// instead of the item.
pub fn validate_id(field: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Checks every item; the first invalid one rejects the whole batch.
pub fn validate_batch(items: &[BatchMemoryItem]) -> Result<()> {
    for (index, item) in items.iter().enumerate() {
        let checked = validate_content(&item.content).and_then(|()| match &item.agent_id {
            Some(agent_id) => validate_agent_id(agent_id),
            None => Ok(()),
        });

        if let Err(err) = checked {
            return Err(Error::validation(format!(
                "memories[{}]: {}",
                index,
                err.message()
            )));
        }
    }
    Ok(())
}
