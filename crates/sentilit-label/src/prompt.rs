use sentilit_model::{Book, MAX_EMOTIONS};

/// Description characters included in a prompt.
pub const DESCRIPTION_LIMIT: usize = 1000;

/// Build the labeling prompt for one book.
///
/// The prompt is in Portuguese, the language of the listing pages, so the
/// labels come back in that language too.
pub fn build_prompt(book: &Book) -> String {
    let mut description: String = book.description.chars().take(DESCRIPTION_LIMIT).collect();
    if book.description.chars().nth(DESCRIPTION_LIMIT).is_some() {
        description.push_str("... [truncado]");
    }

    format!(
        "Analise o livro abaixo e identifique os 3 principais sentimentos que ele transmite.\n\
         Considere o estilo característico do autor {author}.\n\
         Responda APENAS com uma lista JSON contendo exatamente 3 sentimentos em português.\n\
         \n\
         Exemplo válido: [\"melancolia\", \"angústia\", \"solidão\"]\n\
         \n\
         Título: {title}\n\
         Autor: {author}\n\
         Descrição: {description}\n",
        author = book.author,
        title = book.title,
    )
}

/// Parse the model's answer into at most [`MAX_EMOTIONS`] labels.
///
/// Code fences are stripped first. Anything that is not a JSON array of
/// strings yields an empty list.
pub fn parse_emotions(raw: &str) -> Vec<String> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    match serde_json::from_str::<Vec<String>>(cleaned.trim()) {
        Ok(labels) => labels
            .into_iter()
            .take(MAX_EMOTIONS)
            .map(|l| l.trim().to_string())
            .collect(),
        Err(e) => {
            tracing::debug!(error = %e, raw = %raw, "Unparseable emotion list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contents() {
        let mut book = Book::new("Edgar Allan Poe", "O Corvo");
        book.description = "Um poema narrativo sobre perda.".into();

        let prompt = build_prompt(&book);
        assert!(prompt.contains("Considere o estilo característico do autor Edgar Allan Poe."));
        assert!(prompt.contains("Título: O Corvo"));
        assert!(prompt.contains("Descrição: Um poema narrativo sobre perda.\n"));
        assert!(prompt.contains("exatamente 3 sentimentos"));
        assert!(!prompt.contains("[truncado]"));
    }

    #[test]
    fn test_prompt_truncates_description_by_chars() {
        let mut book = Book::new("Irmãos Grimm", "Contos");
        book.description = "ã".repeat(DESCRIPTION_LIMIT + 50);

        let prompt = build_prompt(&book);
        let expected = format!("Descrição: {}... [truncado]", "ã".repeat(DESCRIPTION_LIMIT));
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"ã".repeat(DESCRIPTION_LIMIT + 1)));
    }

    #[test]
    fn test_parse_plain_and_fenced() {
        assert_eq!(parse_emotions(r#"["medo", "melancolia", "mistério"]"#), ["medo", "melancolia", "mistério"]);
        assert_eq!(
            parse_emotions("```json\n[\"medo\", \" culpa \", \"loucura\"]\n```"),
            ["medo", "culpa", "loucura"]
        );
        assert_eq!(parse_emotions("```\n[\"alegria\"]\n```"), ["alegria"]);
    }

    #[test]
    fn test_parse_truncates_to_three() {
        let labels = parse_emotions(r#"["a", "b", "c", "d", "e"]"#);
        assert_eq!(labels, ["a", "b", "c"]);
    }

    #[test]
    fn test_parse_malformed_yields_empty() {
        for raw in [
            "",
            "medo, culpa, loucura",
            r#"{"sentimentos": ["medo"]}"#,
            r#""medo""#,
            "[1, 2, 3]",
            r#"["medo", "culpa""#,
        ] {
            assert!(parse_emotions(raw).is_empty(), "raw: {raw}");
        }
    }
}
