//! Spell checking using Levenshtein distance
//!
//! Used to suggest the intended name when a parameter or command name is misspelled.

/// Maximum edit distance for a word to count as close.
const MAX_DISTANCE: usize = 2;

/// Find words in the dictionary that are close to the search word, closest first.
pub fn find_close_words<'a>(dictionary: &[&'a str], word: &str) -> Vec<&'a str> {
    let mut comparisons: Vec<(usize, &'a str)> = dictionary
        .iter()
        .map(|valid_word| (levenshtein_distance(word, valid_word), *valid_word))
        .filter(|(distance, _)| *distance <= MAX_DISTANCE)
        .collect();
    comparisons.sort_by_key(|(distance, _)| *distance);
    comparisons.into_iter().map(|(_, w)| w).collect()
}

/// Edit distance between two strings, counted in characters.
///
/// Only two rows of the dynamic programming matrix are kept.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, a_i) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, b_j) in b.iter().enumerate() {
            current[j + 1] = if a_i == *b_j {
                previous[j]
            } else {
                1 + previous[j].min(previous[j + 1]).min(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! distance_tests {
        ( $( ($name: ident, $a: expr, $b: expr, $want: expr), )+ ) => {
            $(
            #[test]
            fn $name() {
                assert_eq!(levenshtein_distance($a, $b), $want);
                assert_eq!(levenshtein_distance($b, $a), $want);
            }
            )+
        };
    }

    distance_tests![
        (both_empty, "", "", 0),
        (one_empty, "", "abc", 3),
        (identical, "store", "store", 0),
        (substitution, "typo", "type", 1),
        (insertion, "lod", "load", 1),
        (mixed, "kitten", "sitting", 3),
    ];

    #[test]
    fn close_words_sorted_by_distance() {
        let dictionary = ["type", "store", "load", "set", "hidden"];
        assert_eq!(find_close_words(&dictionary, "sote"), vec!["store", "set"]);
        assert_eq!(find_close_words(&dictionary, "lod"), vec!["load"]);
        assert!(find_close_words(&dictionary, "xyzzyx").is_empty());
    }
}
