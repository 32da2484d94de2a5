//! CSV export of expense and invoice documents.
//!
//! The output carries two blocks, each with its own header: expense rows
//! first, then invoice rows. Fields containing commas, quotes, or
//! newlines are quoted with RFC 4180 doubling.

use crate::core::model::{Expense, Invoice};
use anyhow::Result;
use std::io::Write;

const EXPENSE_HEADER: [&str; 5] = ["type", "date", "category", "amount", "note"];
const INVOICE_HEADER: [&str; 6] = ["type", "client", "dueDate", "status", "total", "notes"];

pub fn write_csv<W: Write>(writer: W, expenses: &[Expense], invoices: &[Invoice]) -> Result<()> {
    // Flexible: the two blocks have different widths.
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    wtr.write_record(EXPENSE_HEADER)?;
    for e in expenses {
        let amount = e.amount.to_string();
        wtr.write_record([
            "expense",
            e.date.as_str(),
            e.category.as_str(),
            amount.as_str(),
            e.note.as_str(),
        ])?;
    }

    wtr.write_record(INVOICE_HEADER)?;
    for inv in invoices {
        let status = inv.status.to_string();
        let total = inv.total.to_string();
        wtr.write_record([
            "invoice",
            inv.client.as_str(),
            inv.due_date.as_str(),
            status.as_str(),
            total.as_str(),
            "",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::InvoiceStatus;

    fn sample_expense(note: &str) -> Expense {
        Expense {
            date: "2024-03-01".to_string(),
            category: "travel".to_string(),
            amount: 42.5,
            note: note.to_string(),
            ..Expense::default()
        }
    }

    #[test]
    fn test_two_block_layout() {
        let expenses = vec![sample_expense("taxi")];
        let invoices = vec![Invoice {
            client: "Acme".to_string(),
            due_date: "2024-04-01".to_string(),
            status: InvoiceStatus::Paid,
            total: 100.0,
            ..Invoice::default()
        }];

        let mut buf = Vec::new();
        write_csv(&mut buf, &expenses, &invoices).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "type,date,category,amount,note");
        assert_eq!(lines[1], "expense,2024-03-01,travel,42.5,taxi");
        assert_eq!(lines[2], "type,client,dueDate,status,total,notes");
        assert_eq!(lines[3], "invoice,Acme,2024-04-01,paid,100,");
    }

    #[test]
    fn test_embedded_quotes_round_trip() {
        let note = "Hello, \"world\"\n";
        let expenses = vec![sample_expense(note)];

        let mut buf = Vec::new();
        write_csv(&mut buf, &expenses, &[]).unwrap();
        let out = String::from_utf8(buf.clone()).unwrap();
        assert!(out.contains("\"Hello, \"\"world\"\"\n\""));

        // A standard CSV parser recovers the original field.
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(buf.as_slice());
        let record = rdr.records().next().unwrap().unwrap();
        assert_eq!(&record[4], note);
    }
}
