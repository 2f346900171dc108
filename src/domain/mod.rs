//! Domain types shared by the split and aggregation engines.

pub mod expense;
pub mod member;
pub mod split;

pub use expense::{
    AggregationBucket, DailyContribution, ExpenseRecord, MemberShare, SummaryStats,
};
pub use member::{Member, MemberId};
pub use split::{Ledger, PayerSelector, ShareRow, SplitMode};
