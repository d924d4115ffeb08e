//! Types representing the different LLMs which can be used.

/// References a specific chat model served by an OpenAI-compatible API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Model {
    /// The tool-calling snapshot of GPT-3.5 Turbo.
    #[default]
    Gpt35Turbo0613,
    Gpt35Turbo,
    Gpt4o,
    Gpt4oMini,
    Gpt41Mini,
}

impl Model {
    fn all() -> &'static [Model] {
        use Model::*;
        &[Gpt35Turbo0613, Gpt35Turbo, Gpt4o, Gpt4oMini, Gpt41Mini]
    }

    /// The identifier sent as `model` in a completions request.
    pub fn api_str(&self) -> &'static str {
        use Model::*;
        match self {
            Gpt35Turbo0613 => "gpt-3.5-turbo-0613",
            Gpt35Turbo => "gpt-3.5-turbo",
            Gpt4o => "gpt-4o",
            Gpt4oMini => "gpt-4o-mini",
            Gpt41Mini => "gpt-4.1-mini",
        }
    }
}

impl<'a> TryFrom<&'a str> for Model {
    type Error = ();

    fn try_from(s: &'a str) -> Result<Model, Self::Error> {
        Model::all()
            .iter()
            .find(|candidate| candidate.api_str() == s)
            .copied()
            .ok_or(())
    }
}
