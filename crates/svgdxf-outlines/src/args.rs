use svgdxf_core::ConversionOptions;

/// Encodes options into the flag/value pairs dxf_outlines expects.
///
/// The order is fixed by the tool's argument grammar:
/// `--POLY`, `--FLATTENBEZ`, `--ROBO`, `--unit_from_document`,
/// `--units` (only when units are not taken from the document), `--encoding`.
pub fn encode(options: &ConversionOptions) -> Vec<String> {
    let mut args = Vec::with_capacity(12);

    push_flag(&mut args, "--POLY", bool_token(options.use_polyline));
    push_flag(&mut args, "--FLATTENBEZ", bool_token(options.flatten_beziers));
    push_flag(&mut args, "--ROBO", bool_token(options.robo_master));
    push_flag(
        &mut args,
        "--unit_from_document",
        bool_token(options.unit_from_document),
    );
    if !options.unit_from_document {
        push_flag(&mut args, "--units", options.units.as_str());
    }
    push_flag(&mut args, "--encoding", &options.encoding);

    args
}

fn push_flag(args: &mut Vec<String>, name: &str, value: &str) {
    args.push(name.to_string());
    args.push(value.to_string());
}

// Always an explicit value token, never a bare switch
fn bool_token(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
