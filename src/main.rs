//! # Folio CLI
//!
//! Usage:
//!   folio request.json -o pages.json
//!   echo '{ ... }' | folio -o pages.json
//!   folio --example > request.json
//!
//! Set `RUST_LOG=folio=debug` to see layout and pagination decisions.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_request_json());
        return;
    }

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        match fs::read_to_string(&args[1]) {
            Ok(s) => s,
            Err(e) => fail(&format!("Failed to read {}: {e}", args[1])),
        }
    } else {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            fail(&format!("Failed to read stdin: {e}"));
        }
        buf
    };

    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "output.json".to_string());

    match folio::render_json(&input) {
        Ok(bytes) => {
            if let Err(e) = fs::write(&output_path, &bytes) {
                fail(&format!("Failed to write {output_path}: {e}"));
            }
            eprintln!("✓ Written {} bytes to {}", bytes.len(), output_path);
        }
        Err(e) => fail(&e.to_string()),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("✗ {message}");
    process::exit(1);
}

fn example_request_json() -> &'static str {
    r##"{
  "page": {
    "width": 595.28,
    "height": 841.89,
    "margin": { "top": 54, "right": 54, "bottom": 54, "left": 54 }
  },
  "layout": { "inlineBlock": true, "tables": true },
  "pagination": { "repeatTableHeaders": true },
  "document": {
    "kind": { "type": "Document" },
    "children": [
      {
        "kind": { "type": "Heading", "level": 1 },
        "style": { "fontSize": 24, "keepWithNext": true, "margin": { "bottom": 12 } },
        "children": [{ "kind": { "type": "Text", "content": "Invoice #INV-2026-001" } }]
      },
      {
        "kind": { "type": "Paragraph" },
        "style": { "fontSize": 10, "lineHeight": 1.5 },
        "children": [
          { "kind": { "type": "Text", "content": "Billed to " } },
          {
            "kind": { "type": "Strong" },
            "children": [{ "kind": { "type": "Text", "content": "Widget Industries" } }]
          },
          { "kind": { "type": "LineBreak" } },
          { "kind": { "type": "Text", "content": "456 Client Ave, New York, NY 10001" } },
          {
            "kind": { "type": "Span" },
            "style": {
              "display": "InlineBlock",
              "padding": { "left": 4, "right": 4 },
              "borderWidth": { "top": 1, "right": 1, "bottom": 1, "left": 1 }
            },
            "children": [{ "kind": { "type": "Text", "content": "PAID" } }]
          }
        ]
      },
      {
        "kind": { "type": "Table" },
        "style": { "borderSpacing": 2 },
        "children": [
          {
            "kind": { "type": "TableHeader" },
            "children": [
              {
                "kind": { "type": "TableRow" },
                "children": [
                  { "kind": { "type": "TableCell", "header": true }, "children": [{ "kind": { "type": "Text", "content": "Description" } }] },
                  { "kind": { "type": "TableCell", "header": true }, "children": [{ "kind": { "type": "Text", "content": "Qty" } }] },
                  { "kind": { "type": "TableCell", "header": true }, "children": [{ "kind": { "type": "Text", "content": "Total" } }] }
                ]
              }
            ]
          },
          {
            "kind": { "type": "TableBody" },
            "children": [
              {
                "kind": { "type": "TableRow" },
                "children": [
                  { "kind": { "type": "TableCell" }, "children": [{ "kind": { "type": "Text", "content": "Web Development Services" } }] },
                  { "kind": { "type": "TableCell" }, "children": [{ "kind": { "type": "Text", "content": "40" } }] },
                  { "kind": { "type": "TableCell" }, "children": [{ "kind": { "type": "Text", "content": "$6,000.00" } }] }
                ]
              },
              {
                "kind": { "type": "TableRow" },
                "children": [
                  { "kind": { "type": "TableCell" }, "children": [{ "kind": { "type": "Text", "content": "UI/UX Design" } }] },
                  { "kind": { "type": "TableCell" }, "children": [{ "kind": { "type": "Text", "content": "20" } }] },
                  { "kind": { "type": "TableCell" }, "children": [{ "kind": { "type": "Text", "content": "$3,500.00" } }] }
                ]
              }
            ]
          },
          {
            "kind": { "type": "TableFooter" },
            "children": [
              {
                "kind": { "type": "TableRow" },
                "children": [
                  { "kind": { "type": "TableCell" }, "children": [{ "kind": { "type": "Text", "content": "Total" } }] },
                  { "kind": { "type": "TableCell" } },
                  { "kind": { "type": "TableCell" }, "children": [{ "kind": { "type": "Text", "content": "$9,500.00" } }] }
                ]
              }
            ]
          }
        ]
      },
      {
        "kind": { "type": "Paragraph" },
        "style": { "fontSize": 9, "keepTogether": true, "margin": { "top": 24 } },
        "children": [
          { "kind": { "type": "Text", "content": "Payment is due within 15 days of invoice date." } }
        ]
      }
    ]
  }
}"##
}
