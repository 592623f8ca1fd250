//! Test fixtures for creating card content.

/// Front/back text for the `i`th generated card.
pub fn card(i: usize) -> (String, String) {
    (format!("Question {}?", i + 1), format!("Answer {}.", i + 1))
}

/// Bulk import text with `num_cards` valid lines.
pub fn import_text(num_cards: usize) -> String {
    (0..num_cards)
        .map(|i| {
            let (front, back) = card(i);
            format!("{front}, {back}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
