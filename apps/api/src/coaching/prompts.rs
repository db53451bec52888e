// Prompt builders for answer synthesis and refinement.
// Pure string assembly: no I/O, so every prompt is unit-testable.

use crate::coaching::classifier::QuestionKind;
use crate::coaching::synthesizer::ContextBundle;
use crate::llm_client::prompts::{
    CANDIDATE_VOICE_INSTRUCTION, DRAFT_GROUNDING_INSTRUCTION, NO_FABRICATION_INSTRUCTION,
    TEXT_ONLY_INSTRUCTION,
};
use crate::models::profile::CandidateProfile;

const COACH_ROLE: &str = "Você é um treinador de entrevistas de emprego.";

const SYNTHESIS_TASK: &str =
    "Escreva a resposta que o candidato deve dar à pergunta do recrutador.";

const REFINE_TASK: &str = "\
O candidato editou um rascunho da resposta. Lapide esse rascunho: \
corrija, deixe mais claro e mais convincente, mantendo o sentido e os fatos escritos pelo candidato.";

const BREVITY_INSTRUCTION: &str = "Seja direto e objetivo; a resposta precisa ser rápida de ler em voz alta.";

/// A developer (rules) message and a user (data) message for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub developer: String,
    pub user: String,
}

fn line_limit_instruction() -> String {
    format!(
        "Limite: até {} linhas; se a pergunta for um case, até {} linhas.",
        QuestionKind::Standard.line_limit(),
        QuestionKind::Case.line_limit()
    )
}

/// `grounding` names the material the model may draw on for this call.
fn rules(task: &str, grounding: &str) -> String {
    let line_limit = line_limit_instruction();
    [
        COACH_ROLE,
        task,
        grounding,
        CANDIDATE_VOICE_INSTRUCTION,
        BREVITY_INSTRUCTION,
        line_limit.as_str(),
        TEXT_ONLY_INSTRUCTION,
    ]
    .join("\n")
}

/// First-draft prompt. Every input is embedded verbatim, including the market
/// fallback message when search had nothing.
pub fn build_synthesis_prompt(bundle: &ContextBundle<'_>) -> PromptPair {
    let profile = bundle.profile;
    let user = format!(
        "EMPRESA:\n{company}\n\n\
         CURRÍCULO:\n{resume}\n\n\
         VAGA:\n{job}\n\n\
         MERCADO:\n{market}\n\n\
         PERGUNTA DO RECRUTADOR:\n{question}\n\n\
         Responda como o candidato.",
        company = profile.company,
        resume = profile.resume,
        job = profile.job_description,
        market = bundle.market_context,
        question = bundle.question,
    );
    PromptPair {
        developer: rules(SYNTHESIS_TASK, NO_FABRICATION_INSTRUCTION),
        user,
    }
}

/// Polishing prompt for a hand-edited draft. No market context here.
pub fn build_refinement_prompt(
    profile: &CandidateProfile,
    question: &str,
    edited_text: &str,
) -> PromptPair {
    let user = format!(
        "EMPRESA:\n{company}\n\n\
         CURRÍCULO:\n{resume}\n\n\
         VAGA:\n{job}\n\n\
         PERGUNTA DO RECRUTADOR:\n{question}\n\n\
         RASCUNHO EDITADO PELO CANDIDATO:\n{edited_text}\n\n\
         Devolva apenas a versão final da resposta.",
        company = profile.company,
        resume = profile.resume,
        job = profile.job_description,
    );
    PromptPair {
        developer: rules(REFINE_TASK, DRAFT_GROUNDING_INSTRUCTION),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MARKET_UNAVAILABLE;

    fn profile() -> CandidateProfile {
        CandidateProfile::new("5 years in sales", "Account Executive", "Acme")
    }

    #[test]
    fn test_synthesis_prompt_carries_all_inputs_in_order() {
        let profile = profile();
        let bundle = ContextBundle {
            profile: &profile,
            market_context: "Acme cresce 20% ao ano.",
            question: "Tell me about yourself",
        };
        let prompt = build_synthesis_prompt(&bundle);

        let positions: Vec<usize> = [
            "Acme",
            "5 years in sales",
            "Account Executive",
            "Acme cresce 20% ao ano.",
            "Tell me about yourself",
        ]
        .iter()
        .map(|needle| prompt.user.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_synthesis_rules_forbid_fabrication_and_state_limits() {
        let profile = profile();
        let bundle = ContextBundle {
            profile: &profile,
            market_context: MARKET_UNAVAILABLE,
            question: "q",
        };
        let prompt = build_synthesis_prompt(&bundle);
        assert!(prompt.developer.contains(NO_FABRICATION_INSTRUCTION));
        assert!(prompt.developer.contains("até 8 linhas"));
        assert!(prompt.developer.contains("até 10 linhas"));
        assert!(prompt.user.contains(MARKET_UNAVAILABLE));
    }

    #[test]
    fn test_user_text_is_not_interpreted_as_placeholders() {
        let profile = CandidateProfile::new("{question}", "{market}", "Acme");
        let bundle = ContextBundle {
            profile: &profile,
            market_context: "m",
            question: "real question",
        };
        let prompt = build_synthesis_prompt(&bundle);
        assert!(prompt.user.contains("CURRÍCULO:\n{question}"));
        assert!(prompt.user.contains("VAGA:\n{market}"));
    }

    #[test]
    fn test_refinement_prompt_includes_draft_and_polish_task() {
        let prompt = build_refinement_prompt(
            &profile(),
            "Why Acme?",
            "Eu quero trabalhar na Acme porque vendo bem.",
        );
        assert!(prompt.user.contains("RASCUNHO EDITADO PELO CANDIDATO:\nEu quero trabalhar"));
        assert!(prompt.user.contains("Why Acme?"));
        assert!(!prompt.user.contains("MERCADO"));
        assert!(prompt.developer.contains(REFINE_TASK));
        assert!(prompt.developer.contains(TEXT_ONLY_INSTRUCTION));
        assert!(prompt.developer.contains(DRAFT_GROUNDING_INSTRUCTION));
    }

    #[test]
    fn test_refinement_rules_do_not_mention_market_context() {
        let prompt = build_refinement_prompt(&profile(), "Why Acme?", "Rascunho.");
        assert!(!prompt.developer.contains(NO_FABRICATION_INSTRUCTION));
        assert!(!prompt.developer.to_lowercase().contains("mercado"));
        assert!(!prompt.user.to_lowercase().contains("mercado"));
    }
}
