use anyhow::Result;

/// An author and the listing page their books are collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorSource {
    pub name: &'static str,
    pub url: &'static str,
}

/// The authors covered by a default run, in collection order.
pub const CLASSIC_AUTHORS: [AuthorSource; 5] = [
    AuthorSource {
        name: "William Shakespeare",
        url: "https://www.infolivros.org/autores/classicos/livros-william-shakespeare/",
    },
    AuthorSource {
        name: "Irmãos Grimm",
        url: "https://www.infolivros.org/autores/classicos/livros-irmaos-grimm/",
    },
    AuthorSource {
        name: "H.P. Lovecraft",
        url: "https://www.infolivros.org/autores/classicos/livros-hp-lovecraft/",
    },
    AuthorSource {
        name: "Edgar Allan Poe",
        url: "https://www.infolivros.org/autores/classicos/livros-edgar-allan-poe/",
    },
    AuthorSource {
        name: "Agatha Christie",
        url: "https://www.infolivros.org/autores/classicos/livros-agatha-christie/",
    },
];

/// Resolve `--author` filters against [`CLASSIC_AUTHORS`].
///
/// An empty filter list selects every author. Matching is case-insensitive on
/// the display name; the result keeps the table's order.
pub fn select_authors(filters: &[String]) -> Result<Vec<AuthorSource>> {
    if filters.is_empty() {
        return Ok(CLASSIC_AUTHORS.to_vec());
    }

    let wanted: Vec<String> = filters.iter().map(|f| f.trim().to_lowercase()).collect();
    for name in &wanted {
        anyhow::ensure!(
            CLASSIC_AUTHORS.iter().any(|a| a.name.to_lowercase() == *name),
            "Unknown author '{name}'. Known authors: {}",
            CLASSIC_AUTHORS.iter().map(|a| a.name).collect::<Vec<_>>().join(", ")
        );
    }

    Ok(CLASSIC_AUTHORS
        .iter()
        .filter(|a| wanted.contains(&a.name.to_lowercase()))
        .copied()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_by_default() {
        let authors = select_authors(&[]).unwrap();
        assert_eq!(authors.len(), 5);
        assert_eq!(authors[0].name, "William Shakespeare");
    }

    #[test]
    fn test_select_subset_keeps_table_order() {
        let filters = vec!["agatha christie".to_string(), "EDGAR ALLAN POE".to_string()];
        let authors = select_authors(&filters).unwrap();
        let names: Vec<&str> = authors.iter().map(|a| a.name).collect();
        assert_eq!(names, ["Edgar Allan Poe", "Agatha Christie"]);
    }

    #[test]
    fn test_unknown_author_rejected() {
        let err = select_authors(&["Machado de Assis".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Unknown author"));
    }
}
