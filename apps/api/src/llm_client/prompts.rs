// Shared prompt fragments for every coaching call.
// Each pipeline stage defines its own prompts alongside it; the rules that must hold
// for all of them live here.

/// Forbids anything not backed by the supplied résumé, job posting and market context.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
Use apenas o currículo, a vaga e o contexto de mercado fornecidos. \
Não invente informações, números, empresas, cargos ou resultados que não estejam no material.";

/// Grounding rule for polishing a draft, where no market context is supplied.
pub const DRAFT_GROUNDING_INSTRUCTION: &str = "\
Use apenas o currículo, a vaga e o rascunho fornecidos. \
Não acrescente informações, números, empresas, cargos ou resultados que não estejam nesse material.";

/// The answer is spoken by the candidate, in first person.
pub const CANDIDATE_VOICE_INSTRUCTION: &str = "\
Responda em primeira pessoa, como o próprio candidato falaria ao recrutador.";

/// Suppresses preambles and commentary around the answer.
pub const TEXT_ONLY_INSTRUCTION: &str = "\
Devolva somente o texto da resposta, sem títulos, sem explicações e sem comentários sobre a resposta.";
