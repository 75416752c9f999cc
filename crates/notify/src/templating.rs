//! Minijinja template rendering for notification messages.
//!
//! Each [`NotificationCategory`] has a message template. The built-in set
//! can be overridden per category from [`TemplateConfig`]; overrides are
//! syntax-checked once when the [`MessageTemplates`] are built.
//!
//! Templates are arbitrary strings (not pre-registered), so a fresh
//! [`minijinja::Environment`] is created per render call.

use streak_core::config::TemplateConfig;
use streak_core::NotificationCategory;

use crate::traits::NotifyError;

pub const DEFAULT_EMERGENCY: &str =
    "🚨 Don't lose your {{ streak }}-day streak in \"{{ challenge_title }}\"! Check in now!";
pub const DEFAULT_MOTIVATION: &str =
    "🔥 Amazing {{ streak }}-day streak! Keep the momentum going in \"{{ challenge_title }}\"!";
pub const DEFAULT_REMINDER: &str =
    "💪 You're on a {{ streak }}-day roll! Time for today's \"{{ challenge_title }}\" activity!";
pub const DEFAULT_ENCOURAGEMENT: &str =
    "🌟 Day {{ next_day }} awaits! Continue your \"{{ challenge_title }}\" journey!";

/// Values available to message templates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MessageContext {
    pub user_id: String,
    pub streak: u32,
    /// `streak + 1`, the day the participant is working towards.
    pub next_day: u32,
    pub days_since_activity: u32,
    pub challenge_title: String,
    pub category: String,
}

impl MessageContext {
    pub fn new(
        user_id: &str,
        streak: u32,
        days_since_activity: u32,
        challenge_title: &str,
        category: NotificationCategory,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            streak,
            next_day: streak.saturating_add(1),
            days_since_activity,
            challenge_title: challenge_title.to_string(),
            category: category.to_string(),
        }
    }
}

/// One template per notification category.
#[derive(Debug, Clone)]
pub struct MessageTemplates {
    emergency: String,
    motivation: String,
    reminder: String,
    encouragement: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            emergency: DEFAULT_EMERGENCY.to_string(),
            motivation: DEFAULT_MOTIVATION.to_string(),
            reminder: DEFAULT_REMINDER.to_string(),
            encouragement: DEFAULT_ENCOURAGEMENT.to_string(),
        }
    }
}

impl MessageTemplates {
    /// Built-in templates with any configured overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] naming the category whose override
    /// does not parse.
    pub fn from_config(config: &TemplateConfig) -> Result<Self, NotifyError> {
        let renderer = TemplateRenderer::new();
        let mut templates = Self::default();

        let overrides = [
            (NotificationCategory::Emergency, &config.emergency),
            (NotificationCategory::Motivation, &config.motivation),
            (NotificationCategory::Reminder, &config.reminder),
            (NotificationCategory::Encouragement, &config.encouragement),
        ];
        for (category, template) in overrides {
            if let Some(template) = template {
                renderer
                    .validate(template)
                    .map_err(|e| NotifyError::Template(format!("{category}: {e}")))?;
                *templates.slot_mut(category) = template.clone();
            }
        }
        Ok(templates)
    }

    pub fn get(&self, category: NotificationCategory) -> &str {
        match category {
            NotificationCategory::Emergency => &self.emergency,
            NotificationCategory::Motivation => &self.motivation,
            NotificationCategory::Reminder => &self.reminder,
            NotificationCategory::Encouragement => &self.encouragement,
        }
    }

    fn slot_mut(&mut self, category: NotificationCategory) -> &mut String {
        match category {
            NotificationCategory::Emergency => &mut self.emergency,
            NotificationCategory::Motivation => &mut self.motivation,
            NotificationCategory::Reminder => &mut self.reminder,
            NotificationCategory::Encouragement => &mut self.encouragement,
        }
    }
}

/// Renders notification templates using minijinja.
#[derive(Debug)]
pub struct TemplateRenderer {
    _private: (),
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn build_env<'source>() -> minijinja::Environment<'source> {
        let mut env = minijinja::Environment::new();
        env.add_filter("lower", lower_filter);
        env.add_filter("upper", upper_filter);
        env.add_filter("plural", plural_filter);
        env
    }

    /// Render a template string with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template is invalid or
    /// rendering fails.
    pub fn render(&self, template_str: &str, ctx: &MessageContext) -> Result<String, NotifyError> {
        let env = Self::build_env();
        env.render_str(template_str, ctx)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }

    /// Check that a template string parses, without evaluating it.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template has syntax errors.
    pub fn validate(&self, template_str: &str) -> Result<(), NotifyError> {
        let env = Self::build_env();
        env.template_from_str(template_str)
            .map_err(|e| NotifyError::Template(e.to_string()))?;
        Ok(())
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn lower_filter(value: String) -> String {
    value.to_lowercase()
}

fn upper_filter(value: String) -> String {
    value.to_uppercase()
}

/// `{{ streak | plural("day") }}` → "1 day" / "3 days".
fn plural_filter(count: u32, noun: String) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(streak: u32, category: NotificationCategory) -> MessageContext {
        MessageContext::new("user-1", streak, 0, "Morning Run", category)
    }

    #[test]
    fn default_templates_render_full_messages() {
        let renderer = TemplateRenderer::new();
        let templates = MessageTemplates::default();

        let msg = renderer
            .render(templates.get(NotificationCategory::Reminder), &ctx(5, NotificationCategory::Reminder))
            .unwrap();
        assert_eq!(msg, "💪 You're on a 5-day roll! Time for today's \"Morning Run\" activity!");

        let msg = renderer
            .render(
                templates.get(NotificationCategory::Encouragement),
                &ctx(2, NotificationCategory::Encouragement),
            )
            .unwrap();
        assert_eq!(msg, "🌟 Day 3 awaits! Continue your \"Morning Run\" journey!");
    }

    #[test]
    fn quotes_are_not_escaped() {
        let renderer = TemplateRenderer::new();
        let c = MessageContext::new("u", 1, 1, "Tom & \"Jerry\"", NotificationCategory::Emergency);
        let msg = renderer.render("{{ challenge_title }}", &c).unwrap();
        assert_eq!(msg, "Tom & \"Jerry\"");
    }

    #[test]
    fn custom_filters() {
        let renderer = TemplateRenderer::new();
        let c = ctx(1, NotificationCategory::Motivation);
        assert_eq!(renderer.render("{{ streak | plural('day') }}", &c).unwrap(), "1 day");
        assert_eq!(renderer.render("{{ category | lower }}", &c).unwrap(), "motivation");
        let c = ctx(4, NotificationCategory::Reminder);
        assert_eq!(renderer.render("{{ streak | plural('day') }}", &c).unwrap(), "4 days");
    }

    #[test]
    fn overrides_replace_only_their_category() {
        let config = TemplateConfig {
            reminder: Some("Keep going, {{ user_id }}!".to_string()),
            ..TemplateConfig::default()
        };
        let templates = MessageTemplates::from_config(&config).unwrap();
        assert_eq!(templates.get(NotificationCategory::Reminder), "Keep going, {{ user_id }}!");
        assert_eq!(templates.get(NotificationCategory::Emergency), DEFAULT_EMERGENCY);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let config = TemplateConfig {
            motivation: Some("{{ unclosed".to_string()),
            ..TemplateConfig::default()
        };
        match MessageTemplates::from_config(&config).unwrap_err() {
            NotifyError::Template(msg) => assert!(msg.starts_with("MOTIVATION")),
            other => panic!("Expected Template error, got: {:?}", other),
        }
    }

    #[test]
    fn validate_checks_syntax_only() {
        let renderer = TemplateRenderer::new();
        assert!(renderer.validate("Hello {{ nobody_defined }}").is_ok());
        assert!(renderer.validate("{% if %}").is_err());
    }
}
