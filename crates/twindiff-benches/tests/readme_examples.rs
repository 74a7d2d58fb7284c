use twindiff_benches::available_corpora;
use twindiff_core::{render_unified, unified_changes, DiffOptions, RenderConfig, UnifiedOptions};

#[test]
fn twindiff_benches_readme_example() -> Result<(), Box<dyn std::error::Error>> {
    let corpus = available_corpora()
        .iter()
        .find(|c| c.name() == "nested-config")
        .expect("registered corpus");
    let dataset = corpus.load()?;
    let delta = dataset.diff(&DiffOptions::default());
    assert!(delta.is_some());

    let lines =
        unified_changes(dataset.before(), dataset.after(), delta.as_ref(), &UnifiedOptions::default());
    let rendered = render_unified(&lines, &RenderConfig::default());
    println!("{rendered}");
    assert!(rendered.contains("- section0: "));
    Ok(())
}
