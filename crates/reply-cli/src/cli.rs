use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use reply_core::Language;
use reply_engine::{
    GeneratePayload, InboundMessage, LightningPayload, PreviewPayload, ProofreadPayload,
};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "smart-reply")]
#[command(about = "Draft email replies and proofread text with a generative language API")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(long, short, global = true)]
    pub debug: bool,

    /// Settings file (defaults to ~/.smart-reply/config.json)
    #[arg(long, global = true, env = "SMART_REPLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the envelope as a single line
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate reply suggestions for an email thread
    Generate(GenerateArgs),
    /// Generate a single reply using the Lightning presets
    Lightning(LightningArgs),
    /// Proofread a piece of text
    Proofread(ProofreadArgs),
    /// Show the system prompt a generate request would use
    Preview(PreviewArgs),
    /// Read one JSON host message from stdin and answer with an envelope
    Dispatch,
}

#[derive(Args, Debug, Default)]
pub struct ContextArgs {
    /// Email thread text
    #[arg(long, default_value = "")]
    pub context: String,

    /// Read the email thread from a file instead
    #[arg(long, conflicts_with = "context")]
    pub context_file: Option<PathBuf>,
}

impl ContextArgs {
    fn resolve(&self) -> anyhow::Result<String> {
        match &self.context_file {
            Some(path) => read_text(path),
            None => Ok(self.context.clone()),
        }
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub context: ContextArgs,

    /// Reply language (en or ja)
    #[arg(long, short, default_value = "en")]
    pub language: String,

    /// What the reply should say
    #[arg(long)]
    pub intent: Option<String>,

    /// Tone to satisfy; repeatable
    #[arg(long = "tone")]
    pub tones: Vec<String>,

    /// Instruction preset id; repeatable
    #[arg(long = "preset")]
    pub presets: Vec<String>,

    /// Number of suggestions, clamped into 1..=5
    #[arg(long)]
    pub count: Option<String>,
}

#[derive(Args, Debug)]
pub struct LightningArgs {
    #[command(flatten)]
    pub context: ContextArgs,

    #[arg(long, short, default_value = "en")]
    pub language: String,

    /// Instruction preset id; defaults to the Lightning presets
    #[arg(long = "preset")]
    pub presets: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ProofreadArgs {
    /// Text to proofread
    #[arg(long, required_unless_present = "file")]
    pub text: Option<String>,

    /// Read the text from a file instead
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    #[arg(long, short, default_value = "ja")]
    pub language: String,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[arg(long, short, default_value = "ja")]
    pub language: String,

    #[arg(long = "preset")]
    pub presets: Vec<String>,
}

impl Commands {
    /// Host message for every subcommand except `dispatch`.
    pub fn to_message(&self) -> anyhow::Result<Option<InboundMessage>> {
        let message = match self {
            Commands::Generate(args) => InboundMessage::Generate(GeneratePayload {
                context: args.context.resolve()?,
                language: Language::from_code(&args.language),
                user_prompt: args.intent.clone(),
                tones: args.tones.clone(),
                instruction_preset_ids: args.presets.clone(),
                suggestion_count: args.count.as_deref().map(count_value),
            }),
            Commands::Lightning(args) => InboundMessage::Lightning(LightningPayload {
                context: args.context.resolve()?,
                language: Language::from_code(&args.language),
                instruction_preset_ids: args.presets.clone(),
            }),
            Commands::Proofread(args) => {
                let text = match (&args.file, &args.text) {
                    (Some(path), _) => read_text(path)?,
                    (None, Some(text)) => text.clone(),
                    (None, None) => String::new(),
                };
                InboundMessage::Proofread(ProofreadPayload {
                    text,
                    language: Language::from_code(&args.language),
                })
            }
            Commands::Preview(args) => InboundMessage::PromptPreview(PreviewPayload {
                language: Language::from_code(&args.language),
                instruction_preset_ids: args.presets.clone(),
            }),
            Commands::Dispatch => return Ok(None),
        };
        Ok(Some(message))
    }
}

/// Numbers stay numbers; anything else is passed on as a string.
fn count_value(raw: &str) -> Value {
    serde_json::from_str::<Value>(raw)
        .ok()
        .filter(Value::is_number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
