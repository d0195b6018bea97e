//! System prompts and user-message templates for the brainstorming agents.

/// System prompt for the assistant that turns a statement into a question.
pub const REPHRASING_SYSTEM_PROMPT: &str = "You are an assistant that re-phrases the statement so that it makes sense and write it as a question, you do not have to provide a solution.";

/// System prompt for the assistant that merges perspectives into a solution.
pub const IDEATION_SYSTEM_PROMPT: &str = "You are an assistant that carefully analyses the list of perspectives given on a problem statement and suggests a solution";

/// Worked example handed to the persona creator so it copies the list shape.
const PERSONA_EXAMPLE_LIST: &str = "[['Population Control Paul', 'Promote and implement government policies that provide incentives for smaller families such as financial benefits and subsidies.'],['Educated Eva', 'Advocate for and invest in accessible education for girls and women to increase their economic opportunities, leading to later marriage and fewer children.'],['Sustainability Sam', 'Encourage sustainable living practices and access to family planning resources to help individuals make informed decisions about the number of children they want.'],['Religious Reuben', 'Collaborate with religious leaders and institutions to promote responsible family planning within their communities, incorporating teachings that emphasize the importance of small families.'],['Technology Tamara', 'Leverage technology such as education apps, contraceptive delivery services, and telemedicine to make family planning more accessible and convenient.']]";

/// Number of personas the creator is asked for.
pub const PERSONA_COUNT: usize = 5;

/// System prompt for the persona creator.
pub fn persona_creator_system_prompt() -> String {
    format!(
        "Refer to this example list: {example}, you have to create a list of {count} imaginary personas having unique and contradicting opinions on how approach the solution of the given problem. The list should follow the exact format of the example list mentioned before. Do not output anything else except the list. Only the list is needed",
        example = PERSONA_EXAMPLE_LIST,
        count = PERSONA_COUNT,
    )
}

/// System prompt that puts an agent in a persona's shoes.
pub fn persona_system_prompt(name: &str, perspective: &str) -> String {
    format!("You are {}, your perspective is : {}", name, perspective)
}

/// One user message per brainstorming step. Fields are already validated.
#[derive(Debug, Clone, Copy)]
pub enum MessageKind<'a> {
    Rephrase {
        statement: &'a str,
    },
    RephraseWithFeedback {
        previous_version: &'a str,
        feedback: &'a str,
    },
    PersonaList {
        problem_statement: &'a str,
    },
    AgentPerspective {
        problem_statement: &'a str,
    },
    AgentFeedback {
        problem_statement: &'a str,
        solution: &'a str,
    },
    GenerateSolution {
        pov_paragraph: &'a str,
        problem_statement: &'a str,
    },
    GenerateSolutionWithFeedback {
        feedback: &'a str,
        previous_solution: Option<&'a str>,
        problem_statement: &'a str,
    },
}

/// Render the user message for a step.
pub fn build_message(kind: &MessageKind<'_>) -> String {
    match *kind {
        MessageKind::Rephrase { statement } => format!(
            "Please re-phrase the following statement so that it makes sense and write it as a question: '{}', provide only one sentence as the response, DO NOT provide a solution.",
            statement
        ),
        MessageKind::RephraseWithFeedback {
            previous_version,
            feedback,
        } => format!(
            "Please re-phrase the following statement so that it makes sense and write it as a question: '{}', based on the feedback: '{}', provide only one sentence as the response, DO NOT provide a solution.",
            previous_version, feedback
        ),
        // The persona creator's system prompt carries the instructions.
        MessageKind::PersonaList { problem_statement } => problem_statement.to_string(),
        MessageKind::AgentPerspective { problem_statement } => format!(
            "based on the perspective defined in your system message, find a solution to {} in 20 words",
            problem_statement
        ),
        MessageKind::AgentFeedback {
            problem_statement,
            solution,
        } => format!(
            "The solution : {} is being proposed for the problem {}, based on the perspective defined in your system message, provide criticism and suggest improvements in 20 words on the proposed solution",
            solution, problem_statement
        ),
        MessageKind::GenerateSolution {
            pov_paragraph,
            problem_statement,
        } => format!(
            "Based on the perspectives described here: {}, form a step wise solution on the problem statement: {} in 120 words",
            pov_paragraph, problem_statement
        ),
        MessageKind::GenerateSolutionWithFeedback {
            feedback,
            previous_solution: Some(previous),
            problem_statement,
        } => format!(
            "Based on the criticism and suggestions described here: {}, improvise the solution : {} for solving the problem statement: {} in 120 words",
            feedback, previous, problem_statement
        ),
        MessageKind::GenerateSolutionWithFeedback {
            feedback,
            previous_solution: None,
            problem_statement,
        } => format!(
            "Based on the criticism and suggestions described here: {}, improvise a solution for solving the problem statement: {} in 120 words",
            feedback, problem_statement
        ),
    }
}
