//! `SeaORM` active enums backed by native Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use bursar_core::catalog;
use bursar_core::ledger::TransactionStatus;
use bursar_core::payment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "fee_applicability")]
pub enum FeeApplicability {
    #[sea_orm(string_value = "CURRICULAR")]
    Curricular,
    #[sea_orm(string_value = "EXTRA_CURRICULAR")]
    ExtraCurricular,
    #[sea_orm(string_value = "BOTH")]
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "fee_frequency")]
pub enum FeeFrequency {
    #[sea_orm(string_value = "MONTHLY")]
    Monthly,
    #[sea_orm(string_value = "QUARTERLY")]
    Quarterly,
    #[sea_orm(string_value = "HALF_YEARLY")]
    HalfYearly,
    #[sea_orm(string_value = "ANNUAL")]
    Annual,
    #[sea_orm(string_value = "ONE_TIME")]
    OneTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "fee_transaction_status")]
pub enum FeeTransactionStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PARTIAL")]
    Partial,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_mode")]
pub enum PaymentMode {
    #[sea_orm(string_value = "CASH")]
    Cash,
    #[sea_orm(string_value = "CHEQUE")]
    Cheque,
    #[sea_orm(string_value = "UPI")]
    Upi,
    #[sea_orm(string_value = "CARD")]
    Card,
    #[sea_orm(string_value = "NET_BANKING")]
    NetBanking,
    #[sea_orm(string_value = "DEMAND_DRAFT")]
    DemandDraft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "assignment_status")]
pub enum AssignmentStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

// ============================================================================
// Conversions to and from the core domain enums
// ============================================================================

macro_rules! mirror_enum {
    ($db:ident, $domain:path, [$($variant:ident),+ $(,)?]) => {
        impl From<$db> for $domain {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$domain> for $db {
            fn from(value: $domain) -> Self {
                type Domain = $domain;
                match value {
                    $(Domain::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(FeeApplicability, catalog::FeeApplicability, [Curricular, ExtraCurricular, Both]);
mirror_enum!(FeeFrequency, catalog::FeeFrequency, [Monthly, Quarterly, HalfYearly, Annual, OneTime]);
mirror_enum!(FeeTransactionStatus, TransactionStatus, [Pending, Partial, Paid, Cancelled]);
mirror_enum!(PaymentMode, payment::PaymentMode, [Cash, Cheque, Upi, Card, NetBanking, DemandDraft]);

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveEnum, Iterable};

    #[test]
    fn test_db_values_match_domain_strings() {
        for status in FeeTransactionStatus::iter() {
            let domain = TransactionStatus::from(status);
            assert_eq!(status.to_value(), domain.as_str());
            assert_eq!(FeeTransactionStatus::from(domain), status);
        }
        for frequency in FeeFrequency::iter() {
            let domain = catalog::FeeFrequency::from(frequency);
            assert_eq!(frequency.to_value(), domain.as_str());
        }
        for mode in PaymentMode::iter() {
            let domain = payment::PaymentMode::from(mode);
            assert_eq!(mode.to_value(), domain.as_str());
        }
        for applicability in FeeApplicability::iter() {
            let domain = catalog::FeeApplicability::from(applicability);
            assert_eq!(applicability.to_value(), domain.as_str());
        }
    }

    #[test]
    fn test_enum_type_names() {
        assert_eq!(FeeTransactionStatus::name().to_string(), "fee_transaction_status");
        assert_eq!(PaymentMode::name().to_string(), "payment_mode");
    }
}
