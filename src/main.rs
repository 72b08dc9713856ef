//! # Folio CLI
//!
//! Usage:
//!   folio input.json -o output.pdf
//!   echo '{ ... }' | folio -o output.pdf
//!   folio input.json --structure
//!   folio --example > invoice.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use folio::FolioError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Lay out a JSON document description as a PDF")]
struct Args {
    /// Document JSON; read from stdin when omitted
    input: Option<PathBuf>,

    /// Output PDF path
    #[arg(short, long, default_value = "output.pdf")]
    output: PathBuf,

    /// Print the layout structure tree as JSON instead of writing a PDF
    #[arg(long)]
    structure: bool,

    /// Print a sample document and exit
    #[arg(long)]
    example: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.example {
        print!("{}", example_invoice_json());
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), FolioError> {
    let input = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    if args.structure {
        println!("{}", folio::structure_json(&input)?.to_json_pretty());
        return Ok(());
    }

    let document = folio::generate_json(&input)?;
    document.save(&args.output)?;
    eprintln!(
        "✓ Written {} page(s), {} bytes to {}",
        document.page_count(),
        document.bytes().len(),
        args.output.display()
    );
    Ok(())
}

fn example_invoice_json() -> &'static str {
    r##"{
  "config": {
    "pageSize": "A4",
    "margins": { "top": 36, "right": 36, "bottom": 36, "left": 36 },
    "pageNumber": { "pattern": "{n}", "totalPattern": "{total}" },
    "metadata": { "title": "Invoice #INV-2026-001", "author": "Acme Corp" }
  },
  "header": [
    {
      "height": 40,
      "cols": [
        {
          "size": 8,
          "components": [
            { "type": "Text", "value": "INVOICE", "props": { "size": 24, "weight": 700 } }
          ]
        },
        {
          "size": 4,
          "components": [
            { "type": "Text", "value": "Acme Corp\n123 Business St, Suite 100", "props": { "align": "Right" } }
          ]
        }
      ]
    },
    { "height": 8, "cols": [{ "components": [{ "type": "Line", "props": { "sizePercent": 100, "offsetPercent": 50 } }] }] }
  ],
  "footer": [
    {
      "cols": [
        { "components": [{ "type": "Text", "value": "Page {n} of {total}", "props": { "align": "Center", "size": 8 } }] }
      ]
    }
  ],
  "rows": [
    {
      "cols": [
        {
          "size": 6,
          "components": [
            { "type": "Text", "value": "Bill To:\nWidget Industries\n456 Client Ave\nNew York, NY 10001" }
          ]
        },
        {
          "size": 6,
          "components": [
            { "type": "Text", "value": "Invoice #: INV-2026-001\nDate: February 14, 2026\nDue: March 1, 2026", "props": { "align": "Right" } }
          ]
        }
      ]
    },
    {
      "height": 20,
      "style": { "backgroundColor": { "r": 0.12, "g": 0.12, "b": 0.18, "a": 1.0 } },
      "cols": [
        { "size": 6, "components": [{ "type": "Text", "value": "Description", "props": { "top": 5, "left": 4, "weight": 700, "color": { "r": 1, "g": 1, "b": 1, "a": 1 } } }] },
        { "size": 2, "components": [{ "type": "Text", "value": "Qty", "props": { "top": 5, "weight": 700, "color": { "r": 1, "g": 1, "b": 1, "a": 1 } } }] },
        { "size": 2, "components": [{ "type": "Text", "value": "Unit Price", "props": { "top": 5, "weight": 700, "color": { "r": 1, "g": 1, "b": 1, "a": 1 } } }] },
        { "size": 2, "components": [{ "type": "Text", "value": "Total", "props": { "top": 5, "right": 4, "weight": 700, "align": "Right", "color": { "r": 1, "g": 1, "b": 1, "a": 1 } } }] }
      ]
    },
    {
      "height": 20,
      "cols": [
        { "size": 6, "style": { "borderType": "Bottom", "borderThickness": 0.5 }, "components": [{ "type": "Text", "value": "Web Development Services", "props": { "top": 5, "left": 4 } }] },
        { "size": 2, "style": { "borderType": "Bottom", "borderThickness": 0.5 }, "components": [{ "type": "Text", "value": "40", "props": { "top": 5 } }] },
        { "size": 2, "style": { "borderType": "Bottom", "borderThickness": 0.5 }, "components": [{ "type": "Text", "value": "$150.00", "props": { "top": 5 } }] },
        { "size": 2, "style": { "borderType": "Bottom", "borderThickness": 0.5 }, "components": [{ "type": "Text", "value": "$6,000.00", "props": { "top": 5, "right": 4, "align": "Right" } }] }
      ]
    },
    {
      "height": 20,
      "cols": [
        { "size": 6, "style": { "borderType": "Bottom", "borderThickness": 0.5 }, "components": [{ "type": "Text", "value": "UI/UX Design", "props": { "top": 5, "left": 4 } }] },
        { "size": 2, "style": { "borderType": "Bottom", "borderThickness": 0.5 }, "components": [{ "type": "Text", "value": "20", "props": { "top": 5 } }] },
        { "size": 2, "style": { "borderType": "Bottom", "borderThickness": 0.5 }, "components": [{ "type": "Text", "value": "$175.00", "props": { "top": 5 } }] },
        { "size": 2, "style": { "borderType": "Bottom", "borderThickness": 0.5 }, "components": [{ "type": "Text", "value": "$3,500.00", "props": { "top": 5, "right": 4, "align": "Right" } }] }
      ]
    },
    {
      "height": 30,
      "cols": [
        { "size": 8 },
        { "size": 4, "components": [{ "type": "Text", "value": "Total: $9,500.00", "props": { "top": 10, "size": 14, "weight": 700, "align": "Right" } }] }
      ]
    },
    {
      "height": 80,
      "cols": [
        { "size": 4, "components": [{ "type": "QrCode", "code": "https://acme.example/invoices/INV-2026-001", "props": { "percent": 70, "center": true } }] },
        { "size": 4 },
        { "size": 4, "components": [{ "type": "Signature", "label": "Authorized Signature", "props": { "safePadding": 40 } }] }
      ]
    }
  ]
}"##
}
