use std::io::Write;

use schema_graph_config::SchemaGraphConfig;
use schemars::generate::SchemaSettings;

pub fn main() {
    let generator = SchemaSettings::draft2020_12()
        .with(|s| {
            s.inline_subschemas = true;
        })
        .into_generator();
    let schema = generator.into_root_schema_for::<SchemaGraphConfig>();
    let schema_str = serde_json::to_string_pretty(&schema).expect("schema serializes to JSON");

    match std::env::args().nth(1) {
        Some(output_file) => {
            let mut file = std::fs::File::create(&output_file).expect("output file can be created");
            file.write_all(schema_str.as_bytes())
                .expect("schema can be written to the output file");

            println!("JSON Schema written to {}", output_file);
        }
        None => {
            println!("{}", schema_str);
        }
    }
}
