//! Request dispatcher.
//!
//! Drives one request through
//! `Idle -> ResolvingConfig -> ResolvingPresets -> BuildingPrompt ->
//! AwaitingNetwork -> Interpreting -> Succeeded | Failed`, logging each
//! transition at debug level. Nothing is retried.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reply_core::{
    presets_from_record, resolve_suggestion_count, ConfigStore, GenerationRequest,
    InstructionPreset, Language, Settings, SETTINGS_KEYS,
};
use reply_llm::{
    interpret_suggestions, interpret_text, CompletionRequest, CompletionResult,
    HttpProviderFactory, ProviderFactory,
};
use tokio_util::sync::CancellationToken;

use crate::config::{DispatcherConfig, ModeProfile};
use crate::envelope::{InboundMessage, PresetSummary, PromptMeta, PromptPreview, ResponseEnvelope};
use crate::error::ReplyError;
use crate::prompt::{
    build_proofread_system_instruction, build_proofread_user_instruction, truncate_chars,
    ResolvedPromptContext,
};
use crate::selection::{lightning_presets, select_presets};
use crate::sequence::{RequestKind, RequestSequencer, Ticket};

pub type Result<T> = std::result::Result<T, ReplyError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    ResolvingConfig,
    ResolvingPresets,
    BuildingPrompt,
    AwaitingNetwork,
    Interpreting,
    Succeeded,
    Failed,
}

/// Phase tracker of a single request.
struct PhaseLog {
    trace: String,
    phase: RequestPhase,
}

impl PhaseLog {
    fn start(kind: RequestKind, id: u64) -> Self {
        let trace = format!("{kind}/{id}");
        log::debug!("[{}] {:?}", trace, RequestPhase::Idle);
        Self {
            trace,
            phase: RequestPhase::Idle,
        }
    }

    fn advance(&mut self, next: RequestPhase) {
        log::debug!("[{}] {:?} -> {:?}", self.trace, self.phase, next);
        self.phase = next;
    }

    fn finish<T>(mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.advance(RequestPhase::Succeeded),
            Err(error) => {
                self.advance(RequestPhase::Failed);
                log::warn!("[{}] Request failed: {}", self.trace, error);
            }
        }
        result
    }
}

/// Outcome of a ticketed submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Delivered(ResponseEnvelope),
    /// A newer request of the same kind was submitted; the result was dropped.
    Superseded(Ticket),
}

impl Delivery {
    pub fn into_envelope(self) -> Option<ResponseEnvelope> {
        match self {
            Delivery::Delivered(envelope) => Some(envelope),
            Delivery::Superseded(_) => None,
        }
    }
}

struct StoredState {
    settings: Settings,
    presets: Vec<InstructionPreset>,
}

/// Resolves configuration, builds prompts, calls the provider and
/// interprets the result.
pub struct RequestDispatcher {
    store: Arc<dyn ConfigStore>,
    providers: Arc<dyn ProviderFactory>,
    config: DispatcherConfig,
    sequencer: RequestSequencer,
    traces: AtomicU64,
}

impl RequestDispatcher {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            store,
            providers: Arc::new(HttpProviderFactory::new()),
            config: DispatcherConfig::default(),
            sequencer: RequestSequencer::new(),
            traces: AtomicU64::new(0),
        }
    }

    pub fn with_provider_factory(mut self, providers: Arc<dyn ProviderFactory>) -> Self {
        self.providers = providers;
        self
    }

    pub fn with_config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn sequencer(&self) -> &RequestSequencer {
        &self.sequencer
    }

    /// Generate a list of distinct reply suggestions.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>> {
        let mut phases = PhaseLog::start(RequestKind::Suggestions, self.next_trace());
        let result = self
            .run_replies(&mut phases, request, &self.config.suggestions, false)
            .await;
        phases.finish(result)
    }

    /// Generate exactly one reply using the Lightning presets.
    pub async fn lightning(&self, request: &GenerationRequest) -> Result<String> {
        let mut phases = PhaseLog::start(RequestKind::Lightning, self.next_trace());
        let result = self
            .run_replies(&mut phases, request, &self.config.lightning, true)
            .await
            .and_then(|suggestions| {
                suggestions
                    .into_iter()
                    .next()
                    .ok_or(ReplyError::EmptyResult)
            });
        phases.finish(result)
    }

    /// Proofread `text` and return the revised version.
    pub async fn proofread(&self, text: &str, language: Language) -> Result<String> {
        let mut phases = PhaseLog::start(RequestKind::Proofread, self.next_trace());
        let result = self.run_proofread(&mut phases, text, language).await;
        phases.finish(result)
    }

    /// The system instruction a reply request would use. Needs no API key.
    pub async fn preview(&self, request: &GenerationRequest) -> Result<PromptPreview> {
        let mut phases = PhaseLog::start(RequestKind::PromptPreview, self.next_trace());
        let result = self.run_preview(&mut phases, request).await;
        phases.finish(result)
    }

    /// Handle a host message, always producing an envelope.
    pub async fn respond(&self, message: &InboundMessage) -> ResponseEnvelope {
        let language = message.language();
        let outcome = match message {
            InboundMessage::Generate(payload) => self
                .generate(&payload.to_request())
                .await
                .map(|suggestions| ResponseEnvelope::suggestions(suggestions, language)),
            InboundMessage::Lightning(payload) => self
                .lightning(&payload.to_request())
                .await
                .map(|suggestion| ResponseEnvelope::suggestion(suggestion, language)),
            InboundMessage::Proofread(payload) => self
                .proofread(&payload.text, payload.language)
                .await
                .map(|suggestion| ResponseEnvelope::suggestion(suggestion, language)),
            InboundMessage::PromptPreview(payload) => self
                .preview(&payload.to_request())
                .await
                .map(ResponseEnvelope::preview),
        };
        outcome.unwrap_or_else(|error| ResponseEnvelope::failure(&error, language))
    }

    /// Handle a host message under last-writer-wins: only the most recently
    /// submitted message of each kind is delivered.
    pub async fn submit(&self, message: InboundMessage) -> Delivery {
        let ticket = self.sequencer.issue(message.kind());
        log::debug!("Submitted {}", ticket);

        let envelope = self.respond(&message).await;

        if self.sequencer.is_current(&ticket) {
            Delivery::Delivered(envelope)
        } else {
            log::warn!(
                "Discarding superseded result {} (latest is #{})",
                ticket,
                self.sequencer.latest(ticket.kind)
            );
            Delivery::Superseded(ticket)
        }
    }

    async fn run_replies(
        &self,
        phases: &mut PhaseLog,
        request: &GenerationRequest,
        profile: &ModeProfile,
        lightning: bool,
    ) -> Result<Vec<String>> {
        let stored = self.load(phases).await?;
        require_api_key(&stored.settings)?;

        phases.advance(RequestPhase::ResolvingPresets);
        let refs = &request.instruction_preset_refs;
        let (presets, count) = if lightning {
            (lightning_presets(&stored.presets, refs, self.config.max_presets), 1)
        } else {
            let count = resolve_suggestion_count(
                request.suggestion_count_override.as_ref(),
                stored.settings.suggestion_count.as_ref(),
            );
            (select_presets(&stored.presets, refs, self.config.max_presets), count)
        };

        phases.advance(RequestPhase::BuildingPrompt);
        let context = ResolvedPromptContext::resolve(request, count, &presets, profile.input_limit);
        log::debug!(
            "[{}] {} suggestion(s) in {} with {} preset(s), context {} chars",
            phases.trace,
            context.count,
            context.language_label(),
            context.presets.len(),
            context.context.chars().count()
        );
        let completion = completion_request(
            profile,
            context.system_instruction(),
            context.user_instruction(),
        );

        let result = self
            .complete(phases, &stored.settings, &completion, profile)
            .await?;

        phases.advance(RequestPhase::Interpreting);
        let suggestions = distinct(interpret_suggestions(&result, &profile.evaluation_context())?);
        if suggestions.is_empty() {
            return Err(ReplyError::EmptyResult);
        }

        log::info!("[{}] Generated {} suggestion(s)", phases.trace, suggestions.len());
        Ok(suggestions)
    }

    async fn run_proofread(
        &self,
        phases: &mut PhaseLog,
        text: &str,
        language: Language,
    ) -> Result<String> {
        let source = text.trim();
        if source.is_empty() {
            return Err(ReplyError::InvalidRequest(
                "text to proofread is empty".to_string(),
            ));
        }

        let profile = &self.config.proofread;
        let stored = self.load(phases).await?;
        require_api_key(&stored.settings)?;

        phases.advance(RequestPhase::BuildingPrompt);
        let label = language.label();
        let completion = completion_request(
            profile,
            build_proofread_system_instruction(label),
            build_proofread_user_instruction(label, &truncate_chars(source, profile.input_limit)),
        );

        let result = self
            .complete(phases, &stored.settings, &completion, profile)
            .await?;

        phases.advance(RequestPhase::Interpreting);
        let revised = interpret_text(&result, &profile.evaluation_context())?;
        if revised.is_empty() {
            return Err(ReplyError::EmptyResult);
        }

        log::info!("[{}] Proofread {} chars", phases.trace, revised.chars().count());
        Ok(revised)
    }

    async fn run_preview(
        &self,
        phases: &mut PhaseLog,
        request: &GenerationRequest,
    ) -> Result<PromptPreview> {
        let stored = self.load(phases).await?;

        phases.advance(RequestPhase::ResolvingPresets);
        let presets = select_presets(
            &stored.presets,
            &request.instruction_preset_refs,
            self.config.max_presets,
        );
        let count = resolve_suggestion_count(
            request.suggestion_count_override.as_ref(),
            stored.settings.suggestion_count.as_ref(),
        );

        phases.advance(RequestPhase::BuildingPrompt);
        let context = ResolvedPromptContext::resolve(
            request,
            count,
            &presets,
            self.config.suggestions.input_limit,
        );

        Ok(PromptPreview {
            system_prompt: context.system_instruction(),
            meta: PromptMeta {
                language_label: context.language_label().to_string(),
                count: context.count,
                instruction_presets: presets
                    .iter()
                    .map(|preset| PresetSummary {
                        id: preset.id.clone(),
                        name: preset.name.clone(),
                    })
                    .collect(),
            },
        })
    }

    async fn load(&self, phases: &mut PhaseLog) -> Result<StoredState> {
        phases.advance(RequestPhase::ResolvingConfig);
        let record = self.store.get(SETTINGS_KEYS).await?;
        let settings = Settings::from_record(&record);
        let presets = presets_from_record(&record);
        log::debug!(
            "[{}] Loaded {:?} with {} stored preset(s)",
            phases.trace,
            settings,
            presets.len()
        );
        Ok(StoredState { settings, presets })
    }

    async fn complete(
        &self,
        phases: &mut PhaseLog,
        settings: &Settings,
        request: &CompletionRequest,
        profile: &ModeProfile,
    ) -> Result<CompletionResult> {
        let provider = self.providers.create(settings)?;

        phases.advance(RequestPhase::AwaitingNetwork);
        log::debug!(
            "[{}] Calling {} provider (timeout {:?})",
            phases.trace,
            provider.name(),
            profile.timeout
        );

        let cancel = CancellationToken::new();
        match tokio::time::timeout(profile.timeout, provider.complete(request, &cancel)).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                cancel.cancel();
                Err(ReplyError::Timeout {
                    after: profile.timeout,
                })
            }
        }
    }

    fn next_trace(&self) -> u64 {
        self.traces.fetch_add(1, Ordering::Relaxed) + 1
    }
}

fn require_api_key(settings: &Settings) -> Result<()> {
    match settings.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(ReplyError::MissingApiKey),
    }
}

fn completion_request(
    profile: &ModeProfile,
    system_instruction: String,
    user_instruction: String,
) -> CompletionRequest {
    CompletionRequest {
        system_instruction,
        user_instruction,
        response_format: profile.response_format,
        temperature: profile.temperature,
        max_output_tokens: profile.max_output_tokens,
    }
}

/// Drop repeated suggestions, keeping first occurrences in order.
fn distinct(suggestions: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    suggestions
        .into_iter()
        .filter(|suggestion| seen.insert(suggestion.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reply_core::MemoryConfigStore;
    use serde_json::json;

    fn dispatcher(record: serde_json::Value) -> RequestDispatcher {
        RequestDispatcher::new(Arc::new(MemoryConfigStore::from_json(record)))
    }

    #[test]
    fn distinct_keeps_first_occurrence() {
        let list = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert_eq!(distinct(list), vec!["a", "b"]);
    }

    #[test]
    fn preview_needs_no_key() {
        let dispatcher = dispatcher(json!({
            "suggestionCount": 99,
            "instructionPresets": {"entries": [
                {"id": "p1", "name": "Formal", "content": "Use keigo."},
                {"id": "p2", "name": "Short", "content": ""}
            ]}
        }));
        let request = GenerationRequest::new("", Language::Ja).with_preset_refs(["p2", "nope", "p1"]);

        let preview = tokio_test::block_on(dispatcher.preview(&request)).unwrap();

        assert_eq!(preview.meta.count, 5);
        assert_eq!(preview.meta.language_label, "Japanese");
        let ids: Vec<&str> = preview
            .meta
            .instruction_presets
            .iter()
            .map(|preset| preset.id.as_str())
            .collect();
        assert_eq!(ids, vec!["p2", "p1"]);
        assert!(preview.system_prompt.contains("exactly 5 strings"));
        assert!(preview.system_prompt.contains("#1 Short"));
    }

    #[test]
    fn missing_key_fails_before_provider() {
        let dispatcher = dispatcher(json!({}));
        let request = GenerationRequest::new("Hello", Language::En);
        let error = tokio_test::block_on(dispatcher.generate(&request)).unwrap_err();
        assert!(matches!(error, ReplyError::MissingApiKey));
    }

    #[test]
    fn empty_proofread_text_is_rejected() {
        let dispatcher = dispatcher(json!({"apiKey": "key"}));
        let error = tokio_test::block_on(dispatcher.proofread("  \n ", Language::Ja)).unwrap_err();
        assert!(matches!(error, ReplyError::InvalidRequest(_)));
    }
}
