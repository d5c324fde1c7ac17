use crate::models::PlayerStatsEntry;

/// Capitalise the first letter of every word and lowercase the rest, where a
/// word starts after any non-alphabetic character ("O'NEIL" -> "O'Neil").
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;

    for c in value.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Find the stats row for a lineup player.
///
/// The lineup and the stats component share no id, so rows are joined on the
/// shirt number plus the player's first name appearing anywhere in the row's
/// (title-cased) name. The scan stops at the first row that satisfies both:
/// with two same-numbered rows whose names both contain the first name, the
/// earlier row wins even if the later one is the exact name. A player without
/// a number never matches.
pub fn find_player_stats<'a>(
    player_name: &str,
    number: Option<u32>,
    rows: &'a [PlayerStatsEntry],
) -> Option<&'a PlayerStatsEntry> {
    let number = number?;
    let first_name = player_name.split(' ').next().unwrap_or_default();

    rows.iter().find(|row| {
        row.player_number == Some(number)
            && title_case(row.name.as_deref().unwrap_or_default()).contains(first_name)
    })
}
