use rb_ordered_map::RbMap;

const TEXT: &str = "the quick brown fox jumps over the lazy dog the fox";

fn main() {
    let mut counts: RbMap<&str, usize> = RbMap::new();
    for word in TEXT.split_whitespace() {
        *counts.entry(word).or_default() += 1;
    }

    assert_eq!(counts.get(&"the"), Some(&3));
    assert_eq!(counts.get(&"fox"), Some(&2));
    assert_eq!(counts.len(), 8);

    // words are visited in lexicographic order
    let words: Vec<_> = counts.keys().copied().collect();
    assert_eq!(
        words,
        vec!["brown", "dog", "fox", "jumps", "lazy", "over", "quick", "the"]
    );

    // everything from "f" up to, but not including, "p"
    let (first, last) = (counts.lower_bound(&"f"), counts.lower_bound(&"p"));
    let middle: Vec<_> = counts.range_between(first, last).map(|(w, _)| *w).collect();
    assert_eq!(middle, vec!["fox", "jumps", "lazy", "over"]);

    for (word, count) in &counts {
        println!("{word}: {count}");
    }
}
