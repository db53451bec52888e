//! Response shaping: caps an answer to the line budget of its question kind.

use crate::coaching::classifier::QuestionKind;

/// Keeps at most `kind.line_limit()` non-blank lines in their original order,
/// then trims the joined block. Lines keep their own indentation. Pure and
/// idempotent; answers under the limit pass through.
pub fn shape(answer: &str, kind: QuestionKind) -> String {
    answer
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(kind.line_limit())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

pub fn line_count(shaped: &str) -> usize {
    shaped.lines().filter(|l| !l.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> String {
        (1..=n).map(|i| format!("linha {i}\n\n   \n")).collect()
    }

    #[test]
    fn test_standard_caps_at_eight_lines_keeping_the_first() {
        let shaped = shape(&numbered(12), QuestionKind::Standard);
        let expected: Vec<String> = (1..=8).map(|i| format!("linha {i}")).collect();
        assert_eq!(shaped, expected.join("\n"));
        assert_eq!(line_count(&shaped), 8);
    }

    #[test]
    fn test_case_caps_at_ten_lines() {
        let shaped = shape(&numbered(12), QuestionKind::Case);
        assert_eq!(line_count(&shaped), 10);
        assert!(shaped.ends_with("linha 10"));
    }

    #[test]
    fn test_short_answer_passes_through() {
        let raw = "Tenho 5 anos em vendas.\n\n   \nBati 120% da meta.\nGosto de negociação.\nFoco em B2B.\nQuero crescer na Acme.";
        for kind in [QuestionKind::Standard, QuestionKind::Case] {
            assert_eq!(
                shape(raw, kind),
                "Tenho 5 anos em vendas.\nBati 120% da meta.\nGosto de negociação.\nFoco em B2B.\nQuero crescer na Acme."
            );
        }
    }

    #[test]
    fn test_indented_lines_keep_their_indentation() {
        let raw = "Minha abordagem:\n  - ouvir o cliente\n\n  - propor plano\n";
        assert_eq!(
            shape(raw, QuestionKind::Standard),
            "Minha abordagem:\n  - ouvir o cliente\n  - propor plano"
        );
    }

    #[test]
    fn test_only_the_block_edges_are_trimmed() {
        let raw = "\n   Primeiro ponto\n  - detalhe  \n   Último ponto   \n";
        assert_eq!(
            shape(raw, QuestionKind::Case),
            "Primeiro ponto\n  - detalhe  \n   Último ponto"
        );
    }

    #[test]
    fn test_shape_is_idempotent() {
        let raw = format!("\r\n  intro\t\r\n  - sub\n{}", numbered(15));
        for kind in [QuestionKind::Standard, QuestionKind::Case] {
            let once = shape(&raw, kind);
            assert_eq!(shape(&once, kind), once);
        }
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(shape("a\r\nb\r\n\r\nc", QuestionKind::Standard), "a\nb\nc");
    }

    #[test]
    fn test_blank_answer_shapes_to_empty() {
        assert_eq!(shape(" \n\t\n", QuestionKind::Case), "");
    }
}
