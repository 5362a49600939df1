//! ApplyEdit command handler.
//!
//! Applies one natural-language change request to an HTML document. The
//! classifier picks a starting tier; each failed tier escalates to a coarser
//! one until the edit lands or full regeneration fails.

use futures::future::try_join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PatchConfig;
use crate::domain::foundation::{EditId, EventId, Timestamp, ValidationError};
use crate::domain::patch::{
    document_from_response, extract_content_from_response, merge, DocumentValidator, EditApplied,
    EditFailed, EditIntentClassifier, KeywordIntentClassifier, ModificationIntent,
    PatchOrchestrator, PatchTier, Replacement, Section, SectionLocator, StrategySelected,
    TierAttempt, TierEscalated, TierFailure,
};
use crate::domain::patch::prompts::{cross_section_prompt, full_regen_prompt, section_prompt};
use crate::ports::{
    GenerationRequest, NoOpPatchEventCallback, PatchEventCallback, RequestMetadata, TextGenerator,
};

/// Command to apply an edit instruction to a document.
#[derive(Debug, Clone)]
pub struct ApplyEditCommand {
    /// Current full document.
    pub document: String,
    /// Natural-language change request.
    pub instruction: String,
}

impl ApplyEditCommand {
    pub fn new(document: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            instruction: instruction.into(),
        }
    }
}

/// Result of a successful edit.
#[derive(Debug, Clone)]
pub struct ApplyEditResult {
    /// The new document. The input document is never modified.
    pub document: String,
    pub edit_id: EditId,
    /// Classifier verdict for the instruction.
    pub intent: ModificationIntent,
    /// Tier that produced `document`.
    pub tier: PatchTier,
    /// Every tier attempted, in order, ending with the successful one.
    pub attempts: Vec<TierAttempt>,
}

/// Errors surfaced to the caller.
#[derive(Debug, Clone, Error)]
pub enum ApplyEditError {
    /// Empty instruction or document.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Every tier failed. The reason stays in logs and events.
    #[error("could not apply this edit, please try again")]
    EditFailed {
        edit_id: EditId,
        reason: String,
        last_failure: Option<TierFailure>,
    },
}

/// Tunables for the tier pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyEditConfig {
    pub min_document_length: usize,
    pub truncation_ratio: f64,
    pub section_max_tokens: u32,
    pub document_max_tokens: u32,
    pub temperature: f32,
}

impl Default for ApplyEditConfig {
    fn default() -> Self {
        Self::from(&PatchConfig::default())
    }
}

impl From<&PatchConfig> for ApplyEditConfig {
    fn from(config: &PatchConfig) -> Self {
        Self {
            min_document_length: config.min_document_length,
            truncation_ratio: config.truncation_ratio,
            section_max_tokens: config.section_max_tokens,
            document_max_tokens: config.document_max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Handler for ApplyEdit commands.
pub struct ApplyEditHandler<G>
where
    G: TextGenerator + ?Sized,
{
    generator: Arc<G>,
    classifier: Arc<dyn EditIntentClassifier>,
    locator: SectionLocator,
    validator: DocumentValidator,
    config: ApplyEditConfig,
    events: Arc<dyn PatchEventCallback>,
}

impl<G> ApplyEditHandler<G>
where
    G: TextGenerator + ?Sized,
{
    /// Creates a handler with the keyword classifier and default tunables.
    pub fn new(generator: Arc<G>) -> Self {
        let config = ApplyEditConfig::default();
        Self {
            generator,
            classifier: Arc::new(KeywordIntentClassifier),
            locator: SectionLocator::new(),
            validator: DocumentValidator::new(config.min_document_length),
            config,
            events: Arc::new(NoOpPatchEventCallback),
        }
    }

    pub fn with_config(mut self, config: ApplyEditConfig) -> Self {
        self.validator = DocumentValidator::new(config.min_document_length);
        self.config = config;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn EditIntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_locator(mut self, locator: SectionLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_event_callback(mut self, events: Arc<dyn PatchEventCallback>) -> Self {
        self.events = events;
        self
    }

    /// Handles an apply-edit command.
    pub async fn handle(&self, cmd: ApplyEditCommand) -> Result<ApplyEditResult, ApplyEditError> {
        let instruction = cmd.instruction.trim();
        if instruction.is_empty() {
            return Err(ValidationError::empty_field("instruction").into());
        }
        if cmd.document.trim().is_empty() {
            return Err(ValidationError::empty_field("document").into());
        }

        let started_at = Timestamp::now();
        let edit_id = EditId::new();
        let intent = self.classifier.classify(instruction);
        self.events
            .on_strategy_selected(StrategySelected::new(edit_id, &intent));

        let mut orchestrator = PatchOrchestrator::new(edit_id, intent);

        while let Some(tier) = orchestrator.active_tier() {
            debug!(edit_id = %edit_id, tier = %tier, "Attempting tier");

            let outcome = match tier {
                PatchTier::Incremental => {
                    self.run_incremental(
                        edit_id,
                        orchestrator.intent().target_sections(),
                        &cmd.document,
                        instruction,
                    )
                    .await
                }
                PatchTier::CrossSection | PatchTier::FullRegen => {
                    self.run_whole_document(edit_id, tier, &cmd.document, instruction)
                        .await
                }
                PatchTier::Done => break,
            };

            match outcome {
                Ok(document) => {
                    let tier = orchestrator.record_success().map_err(|e| {
                        ApplyEditError::EditFailed {
                            edit_id,
                            reason: e.to_string(),
                            last_failure: None,
                        }
                    })?;

                    self.events.on_edit_applied(EditApplied {
                        event_id: EventId::new(),
                        edit_id,
                        tier,
                        attempts: orchestrator.attempts().len(),
                        document_len: document.len(),
                        duration_ms: started_at.elapsed_millis(),
                        occurred_at: Timestamp::now(),
                    });

                    return Ok(ApplyEditResult {
                        document,
                        edit_id,
                        tier,
                        attempts: orchestrator.attempts().to_vec(),
                        intent: orchestrator.intent().clone(),
                    });
                }
                Err(failure) => {
                    warn!(
                        edit_id = %edit_id,
                        tier = %tier,
                        failure = failure.kind(),
                        reason = %failure,
                        "Tier failed"
                    );

                    if let Some(next) = orchestrator.record_failure(failure.clone()) {
                        self.events
                            .on_tier_escalated(TierEscalated::new(edit_id, tier, next, &failure));
                        continue;
                    }

                    let reason = failure.to_string();
                    self.events.on_edit_failed(EditFailed {
                        event_id: EventId::new(),
                        edit_id,
                        last_tier: tier,
                        reason: reason.clone(),
                        attempts: orchestrator.attempts().len(),
                        duration_ms: started_at.elapsed_millis(),
                        occurred_at: Timestamp::now(),
                    });

                    return Err(ApplyEditError::EditFailed {
                        edit_id,
                        reason,
                        last_failure: Some(failure),
                    });
                }
            }
        }

        Err(ApplyEditError::EditFailed {
            edit_id,
            reason: "no patch tier available".to_string(),
            last_failure: orchestrator.last_failure().cloned(),
        })
    }

    /// Regenerates only the target sections and splices them back in.
    ///
    /// Every section is located before any generation call is made, so a
    /// single miss costs nothing. Section calls run concurrently; merging
    /// waits for all of them.
    async fn run_incremental(
        &self,
        edit_id: EditId,
        targets: &[String],
        document: &str,
        instruction: &str,
    ) -> Result<String, TierFailure> {
        let sections = targets
            .iter()
            .map(|name| {
                self.locator
                    .locate(document, name)
                    .ok_or_else(|| TierFailure::locator_miss(name.as_str()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let contents = try_join_all(
            sections
                .iter()
                .map(|section| self.generate_section(edit_id, section, instruction)),
        )
        .await?;

        let replacements: Vec<Replacement> = sections
            .into_iter()
            .zip(contents)
            .map(|(section, content)| Replacement::preserving_padding(section, &content))
            .collect();

        let merged = merge(document, &replacements)?;
        self.check(&merged)?;
        Ok(merged)
    }

    async fn generate_section(
        &self,
        edit_id: EditId,
        section: &Section,
        instruction: &str,
    ) -> Result<String, TierFailure> {
        let (system, user) = section_prompt(section, instruction);
        let request = GenerationRequest::new(RequestMetadata::for_section(edit_id, &section.name))
            .with_system_instruction(system)
            .with_user_message(user)
            .with_max_tokens(self.config.section_max_tokens)
            .with_temperature(self.config.temperature);

        let response = self.generator.generate(request).await?;
        if response.is_truncated() {
            return Err(TierFailure::Generation(format!(
                "response for section '{}' hit the token limit",
                section.name
            )));
        }

        let content = extract_content_from_response(&response.content, &section.name);
        if content.trim().is_empty() {
            return Err(TierFailure::Generation(format!(
                "empty response for section '{}'",
                section.name
            )));
        }

        debug!(
            edit_id = %edit_id,
            section = %section.name,
            has_marker = section.has_marker,
            content_len = content.len(),
            "Section regenerated"
        );
        Ok(content)
    }

    /// One call that returns a complete document.
    ///
    /// Cross-section results shorter than `truncation_ratio` of the original
    /// are rejected. Full regeneration may legitimately shrink the page.
    async fn run_whole_document(
        &self,
        edit_id: EditId,
        tier: PatchTier,
        document: &str,
        instruction: &str,
    ) -> Result<String, TierFailure> {
        let (system, user) = match tier {
            PatchTier::CrossSection => cross_section_prompt(document, instruction),
            _ => full_regen_prompt(document, instruction),
        };
        let request = GenerationRequest::new(RequestMetadata::new(edit_id, tier))
            .with_system_instruction(system)
            .with_user_message(user)
            .with_max_tokens(self.config.document_max_tokens)
            .with_temperature(self.config.temperature);

        let response = self.generator.generate(request).await?;
        let candidate = document_from_response(&response.content);
        let original_len = document.chars().count();
        let candidate_len = candidate.chars().count();

        if response.is_truncated() {
            return Err(TierFailure::TruncationSuspected {
                original_len,
                candidate_len,
            });
        }

        if tier == PatchTier::CrossSection
            && (candidate_len as f64) < original_len as f64 * self.config.truncation_ratio
        {
            return Err(TierFailure::TruncationSuspected {
                original_len,
                candidate_len,
            });
        }

        self.check(&candidate)?;
        info!(
            edit_id = %edit_id,
            tier = %tier,
            original_len,
            candidate_len,
            "Whole-document candidate accepted"
        );
        Ok(candidate)
    }

    fn check(&self, candidate: &str) -> Result<(), TierFailure> {
        let result = self.validator.validate(candidate);
        if result.valid {
            Ok(())
        } else {
            Err(TierFailure::ValidationFailure(result.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::generation::{MockGenerator, MockResponse};
    use crate::domain::patch::{end_marker, start_marker, PatchStrategy};
    use crate::ports::GenerationError;
    use std::sync::Mutex;

    fn page() -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head><title>Bakery</title></head>\n<body>\n\
            {}\n<nav><a href=\"/\">Home</a> <a href=\"/menu\">Menu</a></nav>\n{}\n\
            {}\n<section class=\"hero\"><h1>Fresh bread daily</h1><p>Baked every morning.</p></section>\n{}\n\
            {}\n<footer><p>Open seven days a week, 7am to 3pm.</p></footer>\n{}\n\
            </body>\n</html>\n",
            start_marker("navbar"),
            end_marker("navbar"),
            start_marker("hero"),
            end_marker("hero"),
            start_marker("footer"),
            end_marker("footer"),
        )
    }

    #[derive(Default)]
    struct RecordingCallback {
        escalations: Mutex<Vec<(PatchTier, PatchTier, String)>>,
        applied: Mutex<Vec<PatchTier>>,
        failed: Mutex<Vec<PatchTier>>,
        strategies: Mutex<Vec<PatchStrategy>>,
    }

    impl PatchEventCallback for RecordingCallback {
        fn on_strategy_selected(&self, event: StrategySelected) {
            self.strategies.lock().unwrap().push(event.strategy);
        }
        fn on_tier_escalated(&self, event: TierEscalated) {
            self.escalations
                .lock()
                .unwrap()
                .push((event.from, event.to, event.failure_kind));
        }
        fn on_edit_applied(&self, event: EditApplied) {
            self.applied.lock().unwrap().push(event.tier);
        }
        fn on_edit_failed(&self, event: EditFailed) {
            self.failed.lock().unwrap().push(event.last_tier);
        }
    }

    fn handler(generator: &MockGenerator) -> ApplyEditHandler<MockGenerator> {
        ApplyEditHandler::new(Arc::new(generator.clone()))
    }

    #[tokio::test]
    async fn incremental_edit_replaces_only_target_section() {
        let generator = MockGenerator::new()
            .with_response("<section class=\"hero\" style=\"background:blue\"><h1>Fresh bread daily</h1></section>");
        let original = page();

        let result = handler(&generator)
            .handle(ApplyEditCommand::new(&original, "change the hero background to blue"))
            .await
            .unwrap();

        assert_eq!(result.tier, PatchTier::Incremental);
        assert!(result.document.contains("background:blue"));
        assert!(result.document.contains(&start_marker("hero")));
        assert_eq!(generator.call_count(), 1);

        let hero_start = original.find(&start_marker("hero")).unwrap();
        assert_eq!(&result.document[..hero_start], &original[..hero_start]);
        let footer_start = original.find(&start_marker("footer")).unwrap();
        assert!(result.document.ends_with(&original[footer_start..]));
    }

    #[tokio::test]
    async fn chatty_section_response_is_unwrapped_before_merge() {
        let generator = MockGenerator::new().with_response(
            "Sure! Here is the updated hero:\n```html\n<section class=\"hero\" style=\"background:blue\"><h1>Fresh bread daily</h1></section>\n```\nLet me know if you want other changes.",
        );

        let result = handler(&generator)
            .handle(ApplyEditCommand::new(page(), "change the hero background to blue"))
            .await
            .unwrap();

        assert_eq!(result.tier, PatchTier::Incremental);
        assert!(result.document.contains("background:blue"));
        assert!(!result.document.contains("```"));
        assert!(!result.document.contains("Sure!"));
        assert!(!result.document.contains("Let me know"));
    }

    #[tokio::test]
    async fn full_document_after_long_preamble_narrows_to_section() {
        let updated = page().replace(
            "<section class=\"hero\">",
            "<section class=\"hero\" style=\"background:blue\">",
        );
        let generator = MockGenerator::new().with_response(format!(
            "I've updated the hero background as requested and left the rest of the page untouched. Here is the complete page:\n{}",
            updated
        ));

        let result = handler(&generator)
            .handle(ApplyEditCommand::new(page(), "change the hero background to blue"))
            .await
            .unwrap();

        assert_eq!(result.tier, PatchTier::Incremental);
        assert_eq!(result.document, updated);
        assert_eq!(result.document.matches("<!DOCTYPE").count(), 1);
    }

    #[tokio::test]
    async fn whole_document_response_drops_preamble() {
        let restyled = page().replace("<h1>", "<h1 style=\"color:red\">");
        let generator = MockGenerator::new()
            .with_response(format!("Here is the full page:\n```html\n{}```", restyled));

        let result = handler(&generator)
            .handle(ApplyEditCommand::new(page(), "change every heading color to red"))
            .await
            .unwrap();

        assert_eq!(result.tier, PatchTier::CrossSection);
        assert_eq!(result.document, restyled.trim());
    }

    #[tokio::test]
    async fn section_request_carries_metadata_and_budget() {
        let generator = MockGenerator::new().with_response("<section class=\"hero\">x</section>");

        handler(&generator)
            .handle(ApplyEditCommand::new(page(), "make the hero text bigger"))
            .await
            .unwrap();

        let call = &generator.get_calls()[0];
        assert_eq!(call.metadata.section.as_deref(), Some("hero"));
        assert_eq!(call.metadata.tier, PatchTier::Incremental);
        assert_eq!(call.max_tokens, Some(4096));
        assert!(call.user_message.contains("Fresh bread daily"));
        assert!(!call.user_message.contains("Open seven days"));
    }

    #[tokio::test]
    async fn missing_section_escalates_without_generation() {
        let edited = page().replace("Fresh bread daily", "Testimonials added");
        let generator = MockGenerator::new().with_response(edited.clone());
        let callback = Arc::new(RecordingCallback::default());

        let result = handler(&generator)
            .with_event_callback(callback.clone())
            .handle(ApplyEditCommand::new(page(), "update the testimonials"))
            .await
            .unwrap();

        assert_eq!(result.tier, PatchTier::CrossSection);
        assert_eq!(result.document, edited.trim());
        assert_eq!(generator.call_count(), 1);
        assert_eq!(generator.get_calls()[0].metadata.tier, PatchTier::CrossSection);
        assert_eq!(
            callback.escalations.lock().unwrap().as_slice(),
            &[(
                PatchTier::Incremental,
                PatchTier::CrossSection,
                "locator_miss".to_string()
            )]
        );
        assert_eq!(result.attempts.len(), 2);
        assert!(!result.attempts[0].succeeded());
    }

    #[tokio::test]
    async fn generation_error_escalates() {
        let generator = MockGenerator::new()
            .with_error(GenerationError::unavailable("overloaded"))
            .with_response(page());

        let result = handler(&generator)
            .handle(ApplyEditCommand::new(page(), "make the footer darker"))
            .await
            .unwrap();

        assert_eq!(result.tier, PatchTier::CrossSection);
        assert!(matches!(
            result.attempts[0].failure,
            Some(TierFailure::Generation(_))
        ));
    }

    #[tokio::test]
    async fn token_limited_section_escalates() {
        let generator = MockGenerator::new()
            .with_truncated_response("<footer><p>Open")
            .with_response(page());

        let result = handler(&generator)
            .handle(ApplyEditCommand::new(page(), "make the footer darker"))
            .await
            .unwrap();

        assert_eq!(result.tier, PatchTier::CrossSection);
    }

    #[tokio::test]
    async fn unbalanced_section_fails_validation_and_escalates() {
        let generator = MockGenerator::new()
            .with_response("<footer><div><p>Broken</p></footer>")
            .with_response(page());

        let result = handler(&generator)
            .handle(ApplyEditCommand::new(page(), "make the footer darker"))
            .await
            .unwrap();

        assert_eq!(result.tier, PatchTier::CrossSection);
        assert!(matches!(
            result.attempts[0].failure,
            Some(TierFailure::ValidationFailure(_))
        ));
    }

    #[tokio::test]
    async fn short_cross_section_response_is_rejected() {
        let short = "<!DOCTYPE html><html><body><p>Hi</p></body></html>";
        let generator = MockGenerator::new()
            .with_response(short)
            .with_response(page());

        let result = handler(&generator)
            .handle(ApplyEditCommand::new(page(), "change every heading color to red"))
            .await
            .unwrap();

        assert_eq!(result.tier, PatchTier::FullRegen);
        assert!(matches!(
            result.attempts[0].failure,
            Some(TierFailure::TruncationSuspected { .. })
        ));
    }

    #[tokio::test]
    async fn fenced_whole_document_is_unwrapped() {
        let generator = MockGenerator::new().with_response(format!("```html\n{}\n```", page()));

        let result = handler(&generator)
            .handle(ApplyEditCommand::new(page(), "change every heading color to red"))
            .await
            .unwrap();

        assert_eq!(result.tier, PatchTier::CrossSection);
        assert!(result.document.starts_with("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn full_regen_failure_is_terminal() {
        let generator = MockGenerator::new().with_response("not html at all");
        let callback = Arc::new(RecordingCallback::default());

        let err = handler(&generator)
            .with_event_callback(callback.clone())
            .handle(ApplyEditCommand::new(page(), "redesign the page"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "could not apply this edit, please try again");
        match err {
            ApplyEditError::EditFailed { last_failure, .. } => {
                assert!(matches!(
                    last_failure,
                    Some(TierFailure::ValidationFailure(_))
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(generator.call_count(), 1);
        assert_eq!(
            callback.failed.lock().unwrap().as_slice(),
            &[PatchTier::FullRegen]
        );
        assert_eq!(
            callback.strategies.lock().unwrap().as_slice(),
            &[PatchStrategy::FullRegen]
        );
    }

    #[tokio::test]
    async fn every_tier_failing_reports_error() {
        let generator = MockGenerator::new()
            .with_responder(|_| MockResponse::Error(GenerationError::unavailable("down")));

        let err = handler(&generator)
            .handle(ApplyEditCommand::new(page(), "make the footer darker"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplyEditError::EditFailed { .. }));
        assert_eq!(generator.call_count(), 3);
    }

    #[tokio::test]
    async fn two_sections_are_generated_and_merged() {
        let generator = MockGenerator::new().with_responder(|request| {
            match request.metadata.section.as_deref() {
                Some("hero") => MockResponse::text("<section class=\"hero\"><h1>New hero</h1></section>"),
                Some("footer") => MockResponse::text("<footer><p>New footer</p></footer>"),
                _ => MockResponse::Error(GenerationError::parse("unexpected whole-document call")),
            }
        });

        let result = handler(&generator)
            .handle(ApplyEditCommand::new(page(), "update the hero and the footer"))
            .await
            .unwrap();

        assert_eq!(result.tier, PatchTier::Incremental);
        assert!(result.document.contains("New hero"));
        assert!(result.document.contains("New footer"));
        assert!(result.document.contains("Home</a>"));
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn empty_instruction_is_invalid() {
        let generator = MockGenerator::new();
        let err = handler(&generator)
            .handle(ApplyEditCommand::new(page(), "   "))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplyEditError::InvalidInput(_)));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_document_is_invalid() {
        let generator = MockGenerator::new();
        let err = handler(&generator)
            .handle(ApplyEditCommand::new("", "make the footer darker"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplyEditError::InvalidInput(_)));
    }

    #[test]
    fn config_from_patch_config() {
        let config = ApplyEditConfig::from(&PatchConfig {
            truncation_ratio: 0.8,
            ..Default::default()
        });
        assert_eq!(config.truncation_ratio, 0.8);
        assert_eq!(config.min_document_length, 200);
    }
}
