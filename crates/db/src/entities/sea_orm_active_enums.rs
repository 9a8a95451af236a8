//! String-backed enums stored in the database.
//!
//! Enums with a domain counterpart in `payledger-core` convert both ways.

use payledger_core::{ledger, payroll};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

macro_rules! stored_enum {
    (
        $(#[$meta:meta])*
        $name:ident <=> $module:ident::$domain:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        stored_enum! {
            $(#[$meta])*
            $name {
                $($(#[$vmeta])* $variant = $value),+
            }
        }

        impl From<$module::$domain> for $name {
            fn from(value: $module::$domain) -> Self {
                match value {
                    $($module::$domain::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$name> for $module::$domain {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => Self::$variant,)+
                }
            }
        }
    };
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize,
            Deserialize,
        )]
        #[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[sea_orm(string_value = $value)]
                $variant,
            )+
        }
    };
}

stored_enum! {
    /// Account head category.
    HeadType <=> ledger::HeadType {
        /// Asset.
        Asset = "ASSET",
        /// Liability.
        Liability = "LIABILITY",
        /// Equity.
        Equity = "EQUITY",
        /// Income.
        Income = "INCOME",
        /// Expense.
        Expense = "EXPENSE",
    }
}

stored_enum! {
    /// Entity a ledger is bound to.
    EntityType <=> ledger::EntityType {
        /// Client.
        Client = "CLIENT",
        /// Staff payable.
        Staff = "STAFF",
        /// Staff salary advance.
        StaffAdvance = "STAFF_ADVANCE",
        /// Vendor.
        Vendor = "VENDOR",
        /// Bank account.
        Bank = "BANK",
        /// Cash in hand.
        Cash = "CASH",
        /// Income ledger.
        Income = "INCOME",
        /// Expense ledger.
        Expense = "EXPENSE",
        /// System adjustment.
        Adjustment = "ADJUSTMENT",
        /// Internal ledger.
        Internal = "INTERNAL",
    }
}

stored_enum! {
    /// Ledger lifecycle.
    LedgerStatus {
        /// In use.
        Active = "ACTIVE",
        /// Hidden from pickers; history kept.
        Archived = "ARCHIVED",
    }
}

stored_enum! {
    /// Journal entry type.
    EntryType <=> ledger::EntryType {
        /// Payment.
        Payment = "PAYMENT",
        /// Receipt.
        Receipt = "RECEIPT",
        /// Contra.
        Contra = "CONTRA",
        /// Expense.
        Expense = "EXPENSE",
        /// Income.
        Income = "INCOME",
        /// Journal.
        Journal = "JOURNAL",
    }
}

stored_enum! {
    /// Journal entry nature.
    EntryNature <=> ledger::EntryNature {
        /// General.
        General = "GENERAL",
        /// Advance received from a client.
        AdvanceReceived = "ADVANCE_RECEIVED",
        /// Advance paid to staff.
        AdvancePaid = "ADVANCE_PAID",
    }
}

stored_enum! {
    /// Attendance status.
    AttendanceStatus <=> payroll::AttendanceStatus {
        /// Present.
        Present = "PRESENT",
        /// Absent.
        Absent = "ABSENT",
        /// Half day.
        HalfDay = "HALF_DAY",
        /// On leave.
        Leave = "LEAVE",
        /// Regularized.
        Regularized = "REGULARIZED",
        /// Late.
        Late = "LATE",
    }
}

stored_enum! {
    /// Leave request approval state.
    LeaveStatus {
        /// Awaiting approval.
        Pending = "PENDING",
        /// Approved.
        Approved = "APPROVED",
        /// Rejected.
        Rejected = "REJECTED",
    }
}

stored_enum! {
    /// Payroll type.
    PayrollType <=> payroll::PayrollType {
        /// Full month.
        Monthly = "MONTHLY",
        /// Prorated to date.
        TillDate = "TILL_DATE",
    }
}

stored_enum! {
    /// Payroll run status.
    RunStatus <=> payroll::RunStatus {
        /// Open.
        Draft = "DRAFT",
        /// Confirmed.
        Paid = "PAID",
    }
}

stored_enum! {
    /// Payroll slip status.
    SlipStatus <=> payroll::SlipStatus {
        /// Saved.
        Pending = "PENDING",
        /// Posted.
        Paid = "PAID",
    }
}
