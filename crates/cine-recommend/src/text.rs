//! Text representation and scoring helpers

use cine_core::{Movie, MovieFields, RawMatch, ScoredMatch};

/// Id reported for matches indexed without metadata
pub const UNKNOWN_ID: &str = "unknown";
/// Title reported for matches indexed without metadata
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Synthetic text embedded for a movie
///
/// `Field: value` lines in the order Title, Description, Genre. A field is
/// written whenever it was supplied, even if empty.
pub fn movie_text(fields: &MovieFields) -> String {
    let mut text = format!("Title: {}\n", fields.title);
    if let Some(description) = &fields.description {
        text.push_str(&format!("Description: {description}\n"));
    }
    if let Some(genre) = &fields.genre {
        text.push_str(&format!("Genre: {genre}\n"));
    }
    text
}

/// Query text used to find movies similar to `movie` (title and description)
pub fn similar_query_text(movie: &Movie) -> String {
    let mut text = format!("Title: {}\n", movie.fields.title);
    if let Some(description) = &movie.fields.description {
        text.push_str(&format!("Description: {description}\n"));
    }
    text
}

/// `1 - min(distance, 1)`, rounded to two decimals
///
/// Any distance of 1 or more maps to 0. Negative or NaN distances are
/// clamped so the result always lies in [0, 1].
pub fn similarity_from_distance(distance: f32) -> f32 {
    let distance = if distance.is_nan() {
        1.0
    } else {
        distance.clamp(0.0, 1.0)
    };
    ((1.0 - distance) * 100.0).round() / 100.0
}

/// Score a raw index hit, filling in missing metadata
pub fn scored_match(raw: RawMatch) -> ScoredMatch {
    ScoredMatch {
        id: raw.id.unwrap_or_else(|| UNKNOWN_ID.to_string()),
        title: raw.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        similarity: similarity_from_distance(raw.distance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_movie_text_field_order() {
        let fields = MovieFields::new("Inception")
            .with_genre("Sci-Fi")
            .with_description("A thief who steals secrets via dreams")
            .with_year(2010);

        assert_eq!(
            movie_text(&fields),
            "Title: Inception\nDescription: A thief who steals secrets via dreams\nGenre: Sci-Fi\n"
        );
    }

    #[test]
    fn test_movie_text_skips_absent_fields() {
        assert_eq!(movie_text(&MovieFields::new("Heat")), "Title: Heat\n");

        let with_empty = MovieFields::new("Heat").with_description("");
        assert_eq!(movie_text(&with_empty), "Title: Heat\nDescription: \n");
    }

    #[test]
    fn test_similar_query_text_omits_genre() {
        let movie = Movie {
            id: "1".to_string(),
            fields: MovieFields::new("Alien")
                .with_description("In space no one can hear you scream")
                .with_genre("Horror"),
        };
        assert_eq!(
            similar_query_text(&movie),
            "Title: Alien\nDescription: In space no one can hear you scream\n"
        );
    }

    #[test]
    fn test_similarity_fixed_points() {
        assert_eq!(similarity_from_distance(0.0), 1.0);
        assert_eq!(similarity_from_distance(1.0), 0.0);
        assert_eq!(similarity_from_distance(1.5), 0.0);
        assert_eq!(similarity_from_distance(0.25), 0.75);
        assert_eq!(similarity_from_distance(0.123), 0.88);
        assert_eq!(similarity_from_distance(-0.2), 1.0);
        assert_eq!(similarity_from_distance(f32::NAN), 0.0);
    }

    #[test]
    fn test_scored_match_defaults() {
        let scored = scored_match(RawMatch {
            id: None,
            title: None,
            distance: 0.4,
        });
        assert_eq!(scored.id, "unknown");
        assert_eq!(scored.title, "Unknown Title");
        assert_eq!(scored.similarity, 0.6);
    }

    proptest! {
        #[test]
        fn prop_similarity_in_unit_range(distance in proptest::num::f32::ANY) {
            let s = similarity_from_distance(distance);
            prop_assert!((0.0..=1.0).contains(&s));
        }

        #[test]
        fn prop_far_distances_score_zero(distance in 1.0f32..1e6) {
            prop_assert_eq!(similarity_from_distance(distance), 0.0);
        }
    }
}
