use crate::traits::Message;

/// Everything a provider needs for one completion.
///
/// The persona description, instructions, output schema and embedded context
/// are folded into a single system message by [`GenerationRequest::system_prompt`];
/// providers only ever see the flattened [`GenerationRequest::messages`] plus
/// the sampling settings and the optional schema.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub input: String,
    pub description: Option<String>,
    pub instructions: Vec<String>,
    pub output_schema: Option<serde_json::Value>,
    pub context: Option<String>,
    pub history: Vec<Message>,
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            description: None,
            instructions: Vec::new(),
            output_schema: None,
            context: None,
            history: Vec::new(),
            temperature: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instructions.push(instruction.into());
        self
    }

    pub fn instructions<I, S>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions
            .extend(instructions.into_iter().map(Into::into));
        self
    }

    pub fn output_schema(mut self, schema: serde_json::Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn is_structured(&self) -> bool {
        self.output_schema.is_some()
    }

    /// Flatten persona, instructions, schema and context into one system prompt.
    pub fn system_prompt(&self) -> String {
        let mut sections: Vec<String> = Vec::new();

        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            sections.push(description.to_string());
        }

        if !self.instructions.is_empty() {
            let numbered: Vec<String> = self
                .instructions
                .iter()
                .enumerate()
                .map(|(i, instruction)| format!("{}. {}", i + 1, instruction))
                .collect();
            sections.push(format!(
                "YOU MUST FOLLOW THESE INSTRUCTIONS CAREFULLY.\n<instructions>\n{}\n</instructions>",
                numbered.join("\n")
            ));
        }

        if let Some(schema) = &self.output_schema {
            let rendered =
                serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());
            sections.push(format!(
                "Provide your output as a single JSON object that conforms to this JSON schema:\n\
                 <json_schema>\n{rendered}\n</json_schema>\n\
                 Respond with the JSON object only. Start your response with `{{` and end it with `}}`."
            ));
        }

        if let Some(context) = self.context.as_deref().filter(|c| !c.is_empty()) {
            sections.push(context.to_string());
        }

        sections.join("\n\n")
    }

    /// System prompt, then history in order, then the new input.
    pub fn messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);

        let system = self.system_prompt();
        if !system.is_empty() {
            messages.push(Message::system(system));
        }

        messages.extend(self.history.iter().cloned());

        if !self.input.is_empty() {
            messages.push(Message::user(&self.input));
        }

        messages
    }
}
