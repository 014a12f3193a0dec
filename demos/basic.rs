//! Basic example of using the shidoku engine

use shidoku_core::{
    Canonicalizer, CompletionEnumerator, EquivalenceBucketBuilder, GeometryGroup, Grid,
    LabelGroup, LabelPermutation,
};

fn main() {
    // Enumerate every complete grid
    let solutions = CompletionEnumerator::new().enumerate();
    println!("Complete grids: {}\n", solutions.len());

    // Build the group tables once and share them
    let geometry = GeometryGroup::enumerate_all();
    let labels = LabelGroup::enumerate_all();
    let canon = Canonicalizer::new(&geometry, &labels);

    let relabel = EquivalenceBucketBuilder::build(&solutions, |g| canon.relabel_only(g).0);
    println!("Relabel-only classes: {}", relabel.len());

    let representatives = relabel.canonical_grids();
    let full = EquivalenceBucketBuilder::build(&representatives, |g| canon.full(g));
    println!("Full-symmetry classes: {}\n", full.len());

    for bucket in full.iter() {
        println!("Class {} absorbs {} relabel classes:", bucket.key, bucket.len());
        println!("{}", bucket.key.grid());
    }

    // Relabel a grid by hand
    println!("--- Relabeling a grid ---\n");
    if let Some(grid) = Grid::from_string("1234341221434321") {
        println!("{}", grid);
        if let Ok(reverse) = LabelPermutation::new([4, 3, 2, 1]) {
            println!("After {}:", reverse);
            println!("{}", reverse.apply(&grid));
        }
        println!("Full canonical key: {}", canon.full(&grid));
    }
}
