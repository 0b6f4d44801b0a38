use std::sync::Arc;

use crate::completion::CompletionClient;
use crate::error::{CompletionError, ServiceError};
use crate::types::{ClassificationResult, CompletionRequest};

/// Upper bound on generated tokens per classification.
pub const MAX_TOKENS: u32 = 10;

/// Maps a transaction onto one of a closed set of categories by asking a
/// completion model.
///
/// The classifier holds no mutable state and can be shared across tasks.
pub struct Classifier {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl Classifier {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Classify a single transaction.
    ///
    /// Returns `Ok(None)` when the model answers with something that is not
    /// one of `categories`. Every failure of the completion call is reported
    /// as a [`ServiceError`].
    #[tracing::instrument(skip_all, fields(categories = categories.len(), model = %self.model))]
    pub async fn classify(
        &self,
        categories: &[String],
        destination_name: &str,
        description: &str,
        kind: &str,
    ) -> Result<Option<ClassificationResult>, ServiceError> {
        let prompt = build_prompt(categories, destination_name, description, kind);

        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: prompt.clone(),
            max_tokens: MAX_TOKENS,
        };

        let response = match self.client.complete(request).await {
            Ok(response) => response,
            Err(error) => return Err(report_failure(error)),
        };

        let Some(choice) = response.choices.into_iter().next() else {
            let message = "completion response contained no choices";
            tracing::error!("{}", message);
            return Err(ServiceError::from_message(message));
        };

        let guess = normalize_guess(&choice.text);
        if !categories.contains(&guess) {
            tracing::warn!(
                "Model could not classify the transaction.\nPrompt: {}\nGuess: {}",
                prompt,
                guess
            );
            return Ok(None);
        }

        tracing::debug!(category = %guess, "Transaction classified");
        Ok(Some(ClassificationResult {
            prompt,
            response: choice.text,
            category: guess,
        }))
    }
}

fn report_failure(error: CompletionError) -> ServiceError {
    match &error {
        CompletionError::Service { status, data } => {
            tracing::error!(status = *status, body = %data, "Completion service returned an error");
        }
        CompletionError::Transport(message) => {
            tracing::error!("{}", message);
        }
    }
    ServiceError::from(error)
}

/// Drops the first newline, then surrounding whitespace.
fn normalize_guess(text: &str) -> String {
    text.replacen('\n', "", 1).trim().to_string()
}

/// Render the classification prompt for one transaction.
pub fn build_prompt(
    categories: &[String],
    destination_name: &str,
    description: &str,
    kind: &str,
) -> String {
    format!(
        "\nI want to categorize transactions on my bank account.\n\
         Just output the name of the category.\n\
         Does not have to be a complete sentence.\n\
         Ignore any long string of numbers or special characters.\n\
         The subject is in Mexican Spanish.\n\
         In which category would a transaction ({kind}) from \"{destination_name}\" with the subject \"{description}\" fall into?\n\
         The categories are: \n\
         \n\
         {categories}\n",
        categories = categories.join(", ")
    )
}
