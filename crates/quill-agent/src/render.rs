// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-facing text, glyphs, and inline menus.
//!
//! Emphasis is written as `**bold**`; channel adapters translate it into
//! their own markup. Button payloads are `<prefix><catalog code>`.

use quill_core::QuillError;
use quill_core::catalog::{CatalogItem, ContentType, Framework, Module, entries};
use quill_core::types::{Button, InlineKeyboard};

use crate::submission::WizardState;
use crate::submitter::FinalizeOutcome;

pub const FRAMEWORK_PREFIX: &str = "fw_";
pub const MODULE_PREFIX: &str = "mod_";
pub const CONTENT_TYPE_PREFIX: &str = "type_";

/// A decoded button payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackChoice<'a> {
    Framework(&'a str),
    Module(&'a str),
    ContentType(&'a str),
}

/// Splits a button payload into its step and choice code.
pub fn parse_callback(data: &str) -> Option<CallbackChoice<'_>> {
    if let Some(code) = data.strip_prefix(FRAMEWORK_PREFIX) {
        Some(CallbackChoice::Framework(code))
    } else if let Some(code) = data.strip_prefix(MODULE_PREFIX) {
        Some(CallbackChoice::Module(code))
    } else {
        data.strip_prefix(CONTENT_TYPE_PREFIX)
            .map(CallbackChoice::ContentType)
    }
}

pub fn framework_glyph(framework: Framework) -> &'static str {
    match framework {
        Framework::ConcurrentContractor => "🎯",
        Framework::Operate => "⚙️",
        Framework::Chaos => "🌪️",
    }
}

pub fn module_glyph(module: Module) -> &'static str {
    match module {
        Module::Mindset => "🧠",
        Module::Motive => "🎯",
        Module::Market => "📈",
        Module::Manage => "⚙️",
        Module::Launchpad => "🚀",
        Module::General => "📋",
        Module::MarketingFunnel => "📧",
        Module::LeadMagnet => "🧲",
    }
}

pub fn content_type_glyph(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::CourseModule => "📚",
        ContentType::Worksheet => "📝",
        ContentType::Template => "📄",
        ContentType::EmailCampaign => "📧",
        ContentType::LeadMagnet => "🧲",
        ContentType::Assessment => "✅",
    }
}

/// Curriculum modules drop their "Module N:" numbering on buttons.
fn short_module_label(module: Module) -> &'static str {
    let label = module.label();
    label.split_once(": ").map_or(label, |(_, name)| name)
}

fn short_framework_label(framework: Framework) -> &'static str {
    let label = framework.label();
    label.strip_prefix("The ").unwrap_or(label)
}

pub fn framework_menu(frameworks: &[Framework]) -> InlineKeyboard {
    InlineKeyboard::single_column(frameworks.iter().map(|&f| {
        Button::new(
            format!("{} {}", framework_glyph(f), short_framework_label(f)),
            format!("{FRAMEWORK_PREFIX}{}", f.code()),
        )
    }))
}

pub fn module_menu(modules: &[Module]) -> InlineKeyboard {
    InlineKeyboard::single_column(modules.iter().map(|&m| {
        Button::new(
            format!("{} {}", module_glyph(m), short_module_label(m)),
            format!("{MODULE_PREFIX}{}", m.code()),
        )
    }))
}

pub fn content_type_menu(content_types: &[ContentType]) -> InlineKeyboard {
    InlineKeyboard::single_column(content_types.iter().map(|&t| {
        Button::new(
            format!("{} {}", content_type_glyph(t), t.label()),
            format!("{CONTENT_TYPE_PREFIX}{}", t.code()),
        )
    }))
}

pub fn welcome(agent_name: &str) -> String {
    format!(
        "👋 **Welcome to {agent_name}, The Concurrent Contractor™ content bot!**\n\n\
         I capture your ideas and feed them into the content pipeline.\n\n\
         **How I work:**\n\
         📝 Send me any story, idea, or content concept\n\
         🎯 I'll help you categorise it using your frameworks\n\
         📊 A row is created in the Story Pipeline table\n\
         🆔 Every story gets a sequential Content ID\n\n\
         **Commands:**\n\
         /start - Show this welcome message\n\
         /help - Usage instructions\n\
         /status - Next Content ID and your pending story\n\
         /frameworks - Framework and module overview\n\
         /cancel - Discard the story you are categorising\n\n\
         **Just send me your ideas and I'll guide you through the rest!**"
    )
}

pub fn help(id_prefix: &str, next_id: &str) -> String {
    let modules = Module::CURRICULUM
        .iter()
        .map(|&m| format!("{} {}", module_glyph(m), short_module_label(m)))
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        "🔧 **How to capture a story**\n\n\
         1. Send any text message with your content idea\n\
         2. Pick a framework, a module, and a content type\n\
         3. The story is saved with its own Content ID\n\n\
         **Content IDs:**\n\
         Format: {id_prefix} followed by a sequential number\n\
         The next story will be {next_id}\n\n\
         **Frameworks:**\n\
         🎯 The Concurrent Contractor™ - Main course content\n\
         ⚙️ OPERATE Framework™ - Operational guidance\n\
         🌪️ CHAOS Framework - Risk management\n\n\
         **Modules:**\n\
         {modules}\n\n\
         Sending a new message before you finish starts over with the new text. \
         Use /cancel to drop the current story.\n\n\
         Ready when you are! 🚀"
    )
}

pub fn frameworks_overview() -> String {
    let curriculum = Module::CURRICULUM
        .iter()
        .map(|&m| format!("- {} {}", module_glyph(m), m.label()))
        .collect::<Vec<_>>()
        .join("\n");
    let generic = Module::GENERIC
        .iter()
        .map(|&m| format!("{} {}", module_glyph(m), m.label()))
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        "📚 **Available Frameworks & Modules**\n\n\
         **🎯 The Concurrent Contractor™**\n\
         {curriculum}\n\n\
         **⚙️ OPERATE Framework™**\n\
         - **O**rganise: Structure and plan\n\
         - **P**rioritise: Focus on high-value activities\n\
         - **E**nergise: Match tasks to energy levels\n\
         - **R**ealise: Execute with purpose\n\
         - **A**nalyse: Review and optimise\n\
         - **T**une: Adjust and improve\n\
         - **E**valuate: Measure success\n\n\
         **🌪️ CHAOS Framework**\n\
         - **C**onflicts: Time and priority clashes\n\
         - **H**eadaches: Administrative burden\n\
         - **A**nxiety: Uncertainty and stress\n\
         - **O**verwhelm: Capacity exceeded\n\
         - **S**tagnation: Growth plateau\n\n\
         **Categories for OPERATE and CHAOS:**\n\
         {generic}"
    )
}

pub fn status(agent_name: &str, next_id: &str, state: WizardState) -> String {
    format!(
        "🤖 **{agent_name} status: online**\n\n\
         📊 **Statistics:**\n\
         - Next Content ID: {next_id}\n\
         - Framework options: {}\n\
         - Module options: {}\n\
         - Content types: {}\n\n\
         📝 **Your story:** {state}",
        entries::<Framework>().len(),
        entries::<Module>().len(),
        entries::<ContentType>().len(),
    )
}

pub fn story_received(preview: &str) -> String {
    format!(
        "📝 **Story captured!**\n\nPreview: {preview}\n\n🎯 **Which framework does this belong to?**"
    )
}

pub fn framework_chosen(framework: Framework) -> String {
    format!(
        "✅ **Framework:** {}\n\n📚 **Which module/category?**",
        framework.label()
    )
}

pub fn module_chosen(module: Module) -> String {
    format!(
        "✅ **Module:** {}\n\n📋 **What type of content will this become?**",
        module.label()
    )
}

/// Final message after the store write, synced or not.
pub fn outcome(outcome: &FinalizeOutcome, status_label: &str) -> String {
    if outcome.synced {
        format!(
            "🎉 **Story Successfully Captured!**\n\n\
             **Content ID:** {}\n\
             **Framework:** {}\n\
             **Module:** {}\n\
             **Type:** {}\n\
             **Status:** {status_label}\n\n\
             ✅ **Created in the Story Pipeline table**\n\n\
             Send me another story anytime! 💡",
            outcome.content_id,
            outcome.framework.label(),
            outcome.module.label(),
            outcome.content_type.label(),
        )
    } else {
        format!(
            "⚠️ **Story Captured Locally**\n\n\
             **Content ID:** {}\n\
             **Framework:** {}\n\
             **Module:** {}\n\
             **Type:** {}\n\n\
             ❌ **Sync failed** - Please add manually or check connection.\n\n\
             Keep these details for manual entry.",
            outcome.content_id,
            outcome.framework.label(),
            outcome.module.label(),
            outcome.content_type.label(),
        )
    }
}

/// User-facing hint for a rejected wizard step.
pub fn hint(error: &QuillError) -> String {
    match error {
        QuillError::InvalidState { state, .. } if state == &WizardState::Empty.to_string() => {
            "🤔 There is no story in progress. Send me a message to start a new one.".to_string()
        }
        QuillError::InvalidState { state, .. } => {
            format!(
                "🤔 That button is no longer active; your story is {state}. \
                 Use the latest menu or send a new story."
            )
        }
        QuillError::InvalidChoice { step, code } => {
            format!("🤔 `{code}` is not a {step} option here. Please pick one of the buttons.")
        }
        QuillError::EmptyStory => "📝 Please send some text to capture.".to_string(),
        other => format!("⚠️ Something went wrong: {other}"),
    }
}

pub fn cancelled(had_pending: bool) -> String {
    if had_pending {
        "🗑️ Your story was discarded. Send a new message whenever you're ready.".to_string()
    } else {
        "Nothing to cancel. Send me a story to get started.".to_string()
    }
}

pub fn unknown_command(name: &str) -> String {
    format!("Unknown command /{name}. Try /help.")
}
