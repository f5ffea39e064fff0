use crate::cli::{
    args::ParseArgs,
    config::{check_depth, check_size},
    global::GlobalArgs,
};
use nested_params::{
    CollisionKind, ExpansionReport, ParameterAccess, ParameterMap, ParameterSource, Request,
    Settings,
};
use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

pub fn handle(
    args: ParseArgs,
    global: &GlobalArgs,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = match &args.input {
        Some(input) => input.clone(),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    check_size(input.len(), "input", global)?;

    let mut request = Request::from_uri(input.trim());
    if let Some(path) = &args.form {
        let body = fs::read_to_string(path)?;
        check_size(body.len(), "form body", global)?;
        request = request.with_form_body(body.trim_end());
    }
    let request = Arc::new(request);

    let separator = args
        .separator
        .unwrap_or_else(|| settings.expansion.separator());
    if let Some((name, depth)) = request
        .parameters()
        .map(|(name, _)| (name, name.matches(separator).count()))
        .max_by_key(|(_, depth)| *depth)
    {
        check_depth(depth, name, global)?;
    }

    let mut builder = ParameterMap::builder()
        .settings(&settings.expansion)
        .separator(separator)
        .request(Arc::clone(&request));
    if args.keep_partial_keys {
        builder = builder.keep_partial_keys(true);
    }
    let (mut params, report) = builder.build_with_report(&*request);

    for overlay in &args.overlays {
        params.apply_overlay(overlay)?;
    }

    if args.report || (settings.output.report_collisions && !global.quiet) {
        print_report(&report);
    }

    let output = match &args.get {
        Some(path) => {
            let segments: Vec<&str> = path.split(separator).collect();
            let value = params
                .get(path)
                .or_else(|| params.get_path(&segments))
                .ok_or_else(|| format!("No value at '{}'", path))?;
            serde_json::to_value(value.to_owned_value())?
        }
        None => serde_json::to_value(&params)?,
    };

    let pretty = !args.compact && (args.pretty || settings.output.pretty);
    if pretty {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", serde_json::to_string(&output)?);
    }

    Ok(())
}

fn print_report(report: &ExpansionReport) {
    eprintln!("Expanded {} nested parameter(s)", report.expanded);
    for key in &report.suppressed {
        eprintln!("  suppressed: {} (prefix is a literal parameter)", key);
    }
    for collision in &report.collisions {
        let what = match collision.kind {
            CollisionKind::LeafOverwritten => "value overwritten",
            CollisionKind::NodeReplacedByLeaf => "nested map replaced by value",
            CollisionKind::LeafReplacedByNode => "value replaced by nested map",
        };
        eprintln!(
            "  collision: {} at {} ({})",
            collision.key,
            collision.path.join("/"),
            what
        );
    }
}
