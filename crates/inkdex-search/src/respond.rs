//! Deterministic natural-language rendering of search outcomes.
//!
//! Template selection is keyed by `(intent tag, zero results?)` and sees only
//! the intent and the result count, never record contents, so rendering
//! stays decoupled from retrieval and independently testable.

use inkdex_core::SearchIntent;

/// Pluralized image noun: "1 image", "3 images".
fn image_noun(count: usize) -> String {
    if count == 1 {
        "1 image".to_string()
    } else {
        format!("{} images", count)
    }
}

/// "Here is" / "Here are" agreeing with `count`.
fn here(count: usize) -> &'static str {
    if count == 1 {
        "Here is"
    } else {
        "Here are"
    }
}

/// Render the response sentence for an executed search.
pub fn render(intent: &SearchIntent, result_count: usize) -> String {
    match intent {
        SearchIntent::Keyword { term, .. } => {
            if result_count == 0 {
                format!("I couldn't find any images matching \"{}\".", term)
            } else {
                format!(
                    "{} {} matching \"{}\".",
                    here(result_count),
                    image_noun(result_count),
                    term
                )
            }
        }
        SearchIntent::BodyPart { part, .. } => {
            if result_count == 0 {
                format!("I couldn't find any images with tattoos on the {}.", part)
            } else if result_count == 1 {
                format!("Here is 1 image with a tattoo on the {}.", part)
            } else {
                format!(
                    "Here are {} images with tattoos on the {}.",
                    result_count, part
                )
            }
        }
        SearchIntent::Path { fragment, .. } => {
            if result_count == 0 {
                format!("I couldn't find any images under \"{}\".", fragment)
            } else {
                format!(
                    "{} {} from \"{}\".",
                    here(result_count),
                    image_noun(result_count),
                    fragment
                )
            }
        }
        SearchIntent::Exclusion { .. } => {
            if result_count == 0 {
                "I couldn't find any images without tattoos.".to_string()
            } else if result_count == 1 {
                "Here is 1 image without a tattoo.".to_string()
            } else {
                format!("Here are {} images without tattoos.", result_count)
            }
        }
        SearchIntent::Similarity { .. } => {
            if result_count == 0 {
                "I couldn't find any images similar to the reference image.".to_string()
            } else {
                format!(
                    "{} {} similar to the reference image.",
                    here(result_count),
                    image_noun(result_count)
                )
            }
        }
    }
}

/// Render the clarifying response for a request that could not execute
/// because a required parameter was missing.
pub fn render_clarification(intent: &SearchIntent) -> String {
    match intent {
        SearchIntent::Similarity { .. } => "I need a reference image for a similarity search. \
             Include the image path (for example \"minio:photos/a.jpg\") or attach an image."
            .to_string(),
        _ => "I couldn't work out what to search for. \
             Try naming a keyword, a body part, or a folder."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(term: &str) -> SearchIntent {
        SearchIntent::Keyword {
            term: term.into(),
            limit: 12,
        }
    }

    #[test]
    fn test_keyword_pluralization() {
        let one = render(&keyword("rose"), 1);
        assert!(one.contains("1 image"));
        assert!(!one.contains("1 images"));

        let many = render(&keyword("rose"), 7);
        assert!(many.contains("7 images"));
    }

    #[test]
    fn test_keyword_zero_names_the_term() {
        let zero = render(&keyword("rose"), 0);
        assert!(zero.contains("rose"));
        assert!(zero.contains("couldn't find"));
    }

    #[test]
    fn test_body_part_three_results_exact_phrasing() {
        let intent = SearchIntent::BodyPart {
            part: "arm".into(),
            limit: 12,
        };
        assert_eq!(
            render(&intent, 3),
            "Here are 3 images with tattoos on the arm."
        );
    }

    #[test]
    fn test_body_part_zero_and_singular() {
        let intent = SearchIntent::BodyPart {
            part: "wrist".into(),
            limit: 12,
        };
        assert_eq!(
            render(&intent, 0),
            "I couldn't find any images with tattoos on the wrist."
        );
        assert_eq!(
            render(&intent, 1),
            "Here is 1 image with a tattoo on the wrist."
        );
    }

    #[test]
    fn test_path_templates() {
        let intent = SearchIntent::Path {
            fragment: "intake".into(),
            limit: 20,
        };
        assert_eq!(render(&intent, 2), "Here are 2 images from \"intake\".");
        assert_eq!(
            render(&intent, 0),
            "I couldn't find any images under \"intake\"."
        );
    }

    #[test]
    fn test_exclusion_templates() {
        let intent = SearchIntent::Exclusion { limit: 12 };
        assert_eq!(render(&intent, 5), "Here are 5 images without tattoos.");
        assert_eq!(render(&intent, 1), "Here is 1 image without a tattoo.");
        assert_eq!(
            render(&intent, 0),
            "I couldn't find any images without tattoos."
        );
    }

    #[test]
    fn test_similarity_templates() {
        let intent = SearchIntent::Similarity {
            reference_path: Some("minio:photos/a.jpg".into()),
            image_data: None,
            limit: 12,
        };
        assert_eq!(
            render(&intent, 4),
            "Here are 4 images similar to the reference image."
        );
        assert_eq!(
            render(&intent, 0),
            "I couldn't find any images similar to the reference image."
        );
    }

    #[test]
    fn test_clarification_for_unresolved_similarity() {
        let intent = SearchIntent::Similarity {
            reference_path: None,
            image_data: None,
            limit: 12,
        };
        let text = render_clarification(&intent);
        assert!(text.contains("reference image"));
    }
}
