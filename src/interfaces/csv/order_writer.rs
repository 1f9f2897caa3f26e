use crate::domain::order::Order;
use crate::error::Result;
use std::io::Write;

/// Writes the final order table as CSV.
pub struct OrderWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OrderWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().from_writer(destination),
        }
    }

    pub fn write_orders(&mut self, orders: Vec<Order>) -> Result<()> {
        self.writer
            .write_record(["id", "ticket", "status", "subtotal", "discount", "total"])?;
        for order in orders {
            self.writer.write_record([
                order.id.to_string(),
                order.ticket_code.clone(),
                order.status.to_string(),
                order.subtotal.to_string(),
                order.discount.to_string(),
                order.total.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
