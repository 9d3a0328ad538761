use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use winddown_core::display::display_name;
use winddown_core::ipc::Command;
use winddown_core::process::ProcessRecord;

use super::send;

/// Prints the daemon's process list. With `refresh`, re-polls first;
/// otherwise the cached last-poll result is shown.
pub fn execute(refresh: bool) {
    if refresh {
        send::send_or_exit(&Command::Refresh);
    }

    let response = send::send_or_exit(&Command::List);
    let Some(data) = response.data else {
        eprintln!("Error: daemon sent no process list.");
        std::process::exit(1);
    };
    let records: Vec<ProcessRecord> = match serde_json::from_value(data) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error: malformed process list: {e}");
            std::process::exit(1);
        }
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("PID").set_alignment(CellAlignment::Right),
            Cell::new("Name"),
            Cell::new("Process"),
            Cell::new("Window Title"),
        ]);

    for record in &records {
        table.add_row(vec![
            Cell::new(record.pid).set_alignment(CellAlignment::Right),
            Cell::new(display_name(record)),
            Cell::new(&record.raw_name),
            Cell::new(&record.title),
        ]);
    }

    println!("{table}");
    println!("\n{} applications running", records.len());
}
