use std::collections::HashSet;

/// Jaccard similarity between two token sequences, treated as sets.
///
/// Two empty inputs score `0.0` rather than `1.0`, so headlines that reduce to
/// nothing never look alike.
pub fn jaccard<S: AsRef<str>>(tokens1: &[S], tokens2: &[S]) -> f64 {
    let set1: HashSet<&str> = tokens1.iter().map(AsRef::as_ref).collect();
    let set2: HashSet<&str> = tokens2.iter().map(AsRef::as_ref).collect();

    let union = set1.union(&set2).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set1.intersection(&set2).count();

    intersection as f64 / union as f64
}
