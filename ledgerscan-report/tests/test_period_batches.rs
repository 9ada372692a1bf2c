use ledgerscan_core::PeriodKey;
use ledgerscan_ingest::{FormatRegistry, StatementParser, TextPages};
use ledgerscan_report::{CsvWorkbookSink, PeriodAggregator, PeriodSink};
use std::fs;

const CBA_NOV: &str = "\
02 Nov 2023 Rent to landlord $500.00 $1,500.00
05 Nov 2023 Coffee $4.00 $1,496.00
Any pending transactions are not shown
";

const NAB_NOV: &str = "\
01/11/23 02/11/23 V7202 EFTPOS WOOLWORTHS 1234 SYDNEY 45.60
03/11/23 03/11/23 7202 SALARY ACME PTY LTD 2,000.00
";

/// Two banks' statements for the same month land in one sheet, CommBank
/// rows first because that document was parsed first.
#[test]
fn test_two_banks_one_period() {
    let registry = FormatRegistry::default();
    let parser = StatementParser::new(&registry);

    let cba = parser.parse("CBANov2023.pdf", &TextPages::new([CBA_NOV])).unwrap();
    let nab = parser.parse("NAB_November2023.pdf", &TextPages::new(["cover", NAB_NOV])).unwrap();

    let mut expected = cba.document.records.clone();
    expected.extend(nab.document.records.clone());

    let mut aggregator = PeriodAggregator::default();
    aggregator.extend([cba.document, nab.document]);

    let key = PeriodKey::new("2023", "Nov");
    let batches = aggregator.into_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].key, key);
    assert_eq!(batches[0].records, expected);
    assert_eq!(batches[0].records.len(), 4);

    let dir = tempfile::tempdir().unwrap();
    let mut sink = CsvWorkbookSink::new(dir.path());
    let path = sink.write_period(&batches[0]).unwrap();

    let text = fs::read_to_string(path).unwrap();
    let rows: Vec<_> = text.lines().skip(1).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], "02 Nov 2023,02 Nov 2023,Rent to landlord ,$500.00");
    assert_eq!(rows[3], r#"03/11/23,03/11/23,SALARY ACME PTY LTD ,"2,000.00""#);
}
