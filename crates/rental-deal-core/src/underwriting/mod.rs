pub mod cash_flow;
pub mod deal_score;
pub mod expenses;
pub mod mortgage;
pub mod validation;
