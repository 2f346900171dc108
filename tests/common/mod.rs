#![allow(dead_code)]

use chrono::NaiveDate;
use expense_core::domain::{ExpenseRecord, Member};
use rust_decimal::Decimal;

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn trio() -> Vec<Member> {
    vec![
        Member::new("11", "Asha"),
        Member::new("22", "Ravi"),
        Member::new("33", "Mira"),
    ]
}

pub fn members(n: usize) -> Vec<Member> {
    (1..=n)
        .map(|i| Member::new(format!("{i}"), format!("Member {i}")))
        .collect()
}

pub struct RecordBuilder {
    record: ExpenseRecord,
}

impl RecordBuilder {
    pub fn new(id: &str, amount: &str) -> Self {
        Self {
            record: ExpenseRecord {
                id: id.to_string(),
                description: format!("expense {id}"),
                amount_base_currency: dec(amount),
                category: None,
                location: None,
                date: None,
                stay_start: None,
                stay_end: None,
                shares: Vec::new(),
            },
        }
    }

    pub fn category(mut self, category: &str) -> Self {
        self.record.category = Some(category.to_string());
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.record.location = Some(location.to_string());
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.record.date = Some(date);
        self
    }

    pub fn stay(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.record.stay_start = Some(start);
        self.record.stay_end = Some(end);
        self
    }

    pub fn build(self) -> ExpenseRecord {
        self.record
    }
}
