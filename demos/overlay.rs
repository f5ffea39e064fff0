use nested_params::{ParameterAccess, ParameterMap, RawParameters};

fn main() {
    let raw = RawParameters::from_query("author=Jane&author.name=ignored&a.b=1&a.b.c=2");
    let (mut params, report) = ParameterMap::builder().build_with_report(&raw);

    println!("Suppressed expansions: {:?}", report.suppressed);
    for collision in &report.collisions {
        println!(
            "Collision: {} at {} ({:?})",
            collision.key,
            collision.path.join("."),
            collision.kind
        );
    }

    // Controller-side overrides after construction
    params.put("page", "2");
    params.put("tags", vec!["only"]);
    if let Err(e) = params.apply_overlay("sort=title") {
        eprintln!("{}", e);
    }

    println!("\nauthor = {:?}", params.get("author"));
    println!("tags   = {:?}", params.get("tags"));
    println!("\n{}", serde_json::to_string_pretty(&params).unwrap_or_default());
}
