use crate::strings::templates;

/// A builder for rendering prompts with context.
pub struct PromptRenderer<'a> {
    template: &'a str,
    replacements: Vec<(&'a str, String)>,
}

impl<'a> PromptRenderer<'a> {
    pub fn new(template: &'a str) -> Self {
        Self {
            template,
            replacements: Vec::new(),
        }
    }

    pub fn set(mut self, key: &'a str, value: impl Into<String>) -> Self {
        self.replacements.push((key, value.into()));
        self
    }

    pub fn render(self) -> String {
        // Validate against the template, not the output: substituted values are
        // caller text and may legitimately contain braces.
        let mut rest = self.template;
        while let Some(start) = rest.find("{{") {
            let Some(end) = rest[start..].find("}}") else {
                break;
            };
            let placeholder = &rest[start..start + end + 2];
            if !self.replacements.iter().any(|(key, _)| *key == placeholder) {
                tracing::error!("[PROMPT RENDER ERROR] Unreplaced placeholder in template: {}", placeholder);
            }
            rest = &rest[start + end + 2..];
        }

        let mut result = self.template.to_string();
        for (key, value) in self.replacements {
            result = result.replace(key, &value);
        }
        result
    }
}

/// Instructional prompt sent to the inference backend for a routed task.
pub fn router_prompt(task: &str) -> String {
    PromptRenderer::new(templates::ROUTER_TEMPLATE.trim_end())
        .set("{{TASK}}", task)
        .render()
}
