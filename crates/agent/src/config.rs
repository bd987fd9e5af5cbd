//! Declarative agent and task definitions.
//!
//! These are plain values handed to a [`crate::Crew`]; nothing here talks to a backend.

/// A tool the agent is told it has. The crew fulfils each one before calling the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRef {
    /// Text content of the uploaded financial PDF.
    ReadFinancialPdf,
}

impl ToolRef {
    pub fn name(&self) -> &'static str {
        match self {
            ToolRef::ReadFinancialPdf => "read_data_tool",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolRef::ReadFinancialPdf => {
                "Reads the text content of the financial PDF under analysis, page by page"
            }
        }
    }
}

/// Persona and limits for one agent. `goal` may contain a `{query}` placeholder.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<ToolRef>,
    /// Upper bound on completion rounds for one task.
    pub max_iter: u32,
    /// Completions per rolling minute; 0 disables the limit.
    pub max_rpm: u32,
    pub allow_delegation: bool,
}

impl AgentConfig {
    /// System prompt for this agent with `{query}` filled in.
    pub fn system_prompt(&self, query: &str) -> String {
        let mut prompt = format!(
            "You are a {}.\n\n{}\n\nYour goal: {}",
            self.role,
            self.backstory,
            interpolate(&self.goal, query)
        );
        if !self.tools.is_empty() {
            prompt.push_str("\n\n## Tools\n");
            for tool in &self.tools {
                prompt.push_str(&format!("- {}: {}\n", tool.name(), tool.description()));
            }
        }
        if !self.allow_delegation {
            prompt.push_str("\nWork alone; do not delegate any part of the task.");
        }
        prompt
    }
}

/// A unit of work for an agent. `description` may contain a `{query}` placeholder.
#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub description: String,
    pub expected_output: String,
    pub tools: Vec<ToolRef>,
}

impl TaskConfig {
    /// User prompt for this task, with tool output appended.
    pub fn user_prompt(&self, query: &str, document_text: &str) -> String {
        let mut prompt = format!(
            "{}\n\n## Expected output\n{}",
            interpolate(&self.description, query),
            self.expected_output.trim_end()
        );
        for tool in &self.tools {
            match tool {
                ToolRef::ReadFinancialPdf => {
                    prompt.push_str(&format!("\n\n## {} output\n{}", tool.name(), document_text));
                }
            }
        }
        prompt
    }
}

fn interpolate(template: &str, query: &str) -> String {
    template.replace("{query}", query)
}

/// The analyst persona used by `/analyze`.
pub fn financial_analyst() -> AgentConfig {
    AgentConfig {
        role: "Senior Financial Analyst".into(),
        goal: "Provide a factual, document-grounded analysis for the user's query: {query}. \
               Use only information supported by the provided financial PDF. \
               If information is missing, state that explicitly."
            .into(),
        backstory: "You are an experienced financial analyst skilled at interpreting corporate \
                    financial statements, summarizing key metrics, and explaining implications \
                    clearly and conservatively. You avoid speculation and clearly distinguish \
                    facts from assumptions."
            .into(),
        tools: vec![ToolRef::ReadFinancialPdf],
        max_iter: 5,
        max_rpm: 30,
        allow_delegation: false,
    }
}

/// The grounded-analysis task run for every upload.
pub fn analyze_financial_document() -> TaskConfig {
    TaskConfig {
        description: "Read the provided financial PDF using the read_data_tool output below. \
                      Then provide a concise, document-grounded analysis addressing the user's \
                      query: {query}. Focus on factual content explicitly supported by the \
                      document. If data is missing or unclear, state that explicitly and avoid \
                      speculation."
            .into(),
        expected_output: "A structured response with:\n\
                          - Executive Summary (2-4 bullet points)\n\
                          - Key Financial Highlights (revenue, margins, cash flow, guidance if present; cite where in the doc)\n\
                          - Notable Risks and Assumptions (clearly mark assumptions)\n\
                          - Implications (non-prescriptive, informational)\n\
                          - Data Sources (which document sections/pages informed the analysis)\n"
            .into(),
        tools: vec![ToolRef::ReadFinancialPdf],
    }
}
