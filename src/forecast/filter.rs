use std::collections::HashSet;

use crate::{account::AccountId, forecast::ScheduledTransaction};

/// Keep the transactions that belong to one of `allowed_accounts` or to no account.
///
/// An empty `allowed_accounts` keeps everything.
pub fn filter_by_accounts(
    transactions: Vec<ScheduledTransaction>,
    allowed_accounts: &[AccountId],
) -> Vec<ScheduledTransaction> {
    if allowed_accounts.is_empty() {
        return transactions;
    }

    let allowed: HashSet<AccountId> = allowed_accounts.iter().copied().collect();

    transactions
        .into_iter()
        .filter(|transaction| {
            transaction
                .account_id
                .is_none_or(|account_id| allowed.contains(&account_id))
        })
        .collect()
}
