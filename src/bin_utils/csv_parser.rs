use std::io::Read;

use crate::command::OperationKind;
use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Operation {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub account: String,
    pub counterparty: Option<String>,
    // read as text so the scale survives, csv would otherwise guess a float
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub amount: Option<Decimal>,
}

/// Parses an operation list in CSV format.
///
/// Rows that cannot be deserialized are yielded as errors together with their
/// line, so a single malformed row does not stop the rest of the file.
pub struct CsvOperationParser<R> {
    iter: DeserializeRecordsIntoIter<R, Operation>,
}

impl<R> CsvOperationParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvOperationParser<R>
where
    R: Read,
{
    type Item = (u64, csv::Result<Operation>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn parse_rows() {
        let input = "type, account, counterparty, amount\n\
                     open, Gaspar, , 1000.00\n\
                     transfer, Gaspar, Alicia, 100\n\
                     credit, Gaspar\n\
                     withdraw, Gaspar, , 1\n";
        let rows: Vec<_> = CsvOperationParser::new(input.as_bytes()).collect();
        assert_eq!(rows.len(), 4);

        let (_, open) = &rows[0];
        let open = open.as_ref().unwrap();
        assert_eq!(open.kind, OperationKind::Open);
        assert_eq!(open.account, "Gaspar");
        assert_eq!(open.counterparty, None);
        assert_eq!(open.amount, Some(Decimal::from_str("1000.00").unwrap()));
        assert_eq!(open.amount.unwrap().to_string(), "1000.00");

        let (_, transfer) = &rows[1];
        let transfer = transfer.as_ref().unwrap();
        assert_eq!(transfer.kind, OperationKind::Transfer);
        assert_eq!(transfer.counterparty.as_deref(), Some("Alicia"));

        let (_, credit) = &rows[2];
        assert_eq!(credit.as_ref().unwrap().amount, None);

        let (_, unknown) = &rows[3];
        assert!(unknown.is_err());
    }

    #[test]
    fn amounts_keep_scale_and_digits() {
        let input = "type,account,counterparty,amount\n\
                     open,Gaspar,,1000.00\n\
                     open,Gaspar,,12345678901234567.123456789\n\
                     open,Gaspar,,20000000000000000000\n\
                     open,Gaspar,,0.10\n";
        let amounts: Vec<String> = CsvOperationParser::new(input.as_bytes())
            .map(|(_, row)| row.unwrap().amount.unwrap().to_string())
            .collect();
        assert_eq!(
            amounts,
            [
                "1000.00",
                "12345678901234567.123456789",
                "20000000000000000000",
                "0.10",
            ]
        );
    }
}
