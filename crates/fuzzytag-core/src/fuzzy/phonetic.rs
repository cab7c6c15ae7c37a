//! Soundex-style phonetic codes
//!
//! Codes are always [`CODE_LEN`] characters: the uppercased first letter
//! followed by digits, right-padded with `'0'`. A first letter whose
//! uppercase form is several characters keeps only the first of them.

/// Length of every non-empty phonetic code
pub const CODE_LEN: usize = 4;

/// Digit for a letter; vowels, `h`, `w`, `y` and non-letters have none
#[inline]
fn digit(c: char) -> Option<char> {
    match c.to_ascii_lowercase() {
        'b' | 'f' | 'p' | 'v' => Some('1'),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
        'd' | 't' => Some('3'),
        'l' => Some('4'),
        'm' | 'n' => Some('5'),
        'r' => Some('6'),
        _ => None,
    }
}

/// Encode `word` into its phonetic code. Empty input gives an empty code.
pub fn phonetic_code(word: &str) -> String {
    let letters: Vec<char> = word.chars().collect();
    let Some(&first) = letters.first() else {
        return String::new();
    };

    let mut code = String::with_capacity(CODE_LEN);
    code.push(first.to_uppercase().next().unwrap_or(first));
    let mut len = 1;

    let mut i = 1;
    while i < letters.len() && len < CODE_LEN {
        let current = letters[i];
        let prev = digit(letters[i - 1]);
        let here = digit(current);
        let next = letters.get(i + 1).copied().and_then(digit);

        // h/w between two letters of the same class: drop both h/w and the follower
        if matches!(current.to_ascii_lowercase(), 'h' | 'w') && prev == next {
            i += 2;
            continue;
        }

        if let Some(d) = here {
            code.push(d);
            len += 1;
        }

        // collapse a run of the same class
        if here == next {
            i += 2;
            continue;
        }
        i += 1;
    }

    for _ in len..CODE_LEN {
        code.push('0');
    }

    code
}
