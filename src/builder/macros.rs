//! Macros for ergonomic item type construction.

/// Declare an [`ItemType`](crate::core::ItemType) with required attributes
/// and named rules.
///
/// # Example
///
/// ```
/// use tracking_state_machine::core::Attributes;
/// use tracking_state_machine::item_type;
/// use serde_json::json;
///
/// let account = item_type! {
///     Account
///     required: [id, owner]
///     rules: {
///         "balance is not negative" => |item| {
///             item.get_as::<i64>("balance").map_or(true, |b| b >= 0)
///         },
///     }
/// };
///
/// assert_eq!(account.name(), "Account");
/// assert_eq!(account.rules().len(), 3);
/// assert!(account
///     .validate(Attributes::from_json(json!({"id": 1, "owner": "ana", "balance": 3})))
///     .is_ok());
/// ```
#[macro_export]
macro_rules! item_type {
    (
        $name:ident
        $(required: [$($required:ident),* $(,)?])?
        $(rules: { $($description:literal => $predicate:expr),* $(,)? })?
    ) => {{
        let item_type = $crate::core::ItemType::new(stringify!($name));
        $($(let item_type = item_type.required(stringify!($required));)*)?
        $($(let item_type = item_type.rule($description, $predicate);)*)?
        item_type
    }};
}
