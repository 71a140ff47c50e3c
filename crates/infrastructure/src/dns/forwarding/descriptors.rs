//! Human-readable renderings of DNS messages for the viewer feed.
//!
//! Questions render as `name|class|type` and answer records as
//! `name|ttl|class|type|rdata`, mirroring the tab-separated presentation
//! format with tabs replaced by `|`.

use hickory_proto::op::{Message, Query};
use hickory_proto::rr::Record;

pub fn describe_questions(message: &Message) -> Vec<String> {
    message.queries().iter().map(describe_question).collect()
}

pub fn describe_answers(message: &Message) -> Vec<String> {
    message.answers().iter().map(describe_record).collect()
}

fn describe_question(query: &Query) -> String {
    format!(
        "{}|{}|{}",
        query.name(),
        query.query_class(),
        query.query_type()
    )
}

fn describe_record(record: &Record) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        record.name(),
        record.ttl(),
        record.dns_class(),
        record.record_type(),
        record.data()
    )
}
