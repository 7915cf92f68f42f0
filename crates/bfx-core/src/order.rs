//! Order-related enums.
//!
//! Every enum here has exactly one wire spelling (the venue's upper-case
//! token). `FromStr` is case-insensitive so CLI input like `buy` is accepted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Venue token for this value.
            pub fn as_wire(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_wire())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(CoreError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Order side: buy or sell.
    OrderSide, "side" {
        Buy => "BUY",
        Sell => "SELL",
    }
}

wire_enum! {
    /// Order type as sent in the `type` parameter.
    ///
    /// OCO pairs go to their own endpoint and carry no `type`.
    OrderType, "order type" {
        Market => "MARKET",
        Limit => "LIMIT",
        /// Stop-limit: a limit order armed at `stopPrice`.
        Stop => "STOP",
    }
}

wire_enum! {
    /// Hedge-mode position side.
    PositionSide, "position side" {
        Both => "BOTH",
        Long => "LONG",
        Short => "SHORT",
    }
}

impl Default for PositionSide {
    fn default() -> Self {
        Self::Both
    }
}

wire_enum! {
    /// Time-in-force for resting orders.
    TimeInForce, "time in force" {
        /// Good-til-cancelled.
        Gtc => "GTC",
        /// Immediate-or-cancel.
        Ioc => "IOC",
        /// Fill-or-kill.
        Fok => "FOK",
        /// Good-til-crossing (post only).
        Gtx => "GTX",
    }
}

impl Default for TimeInForce {
    fn default() -> Self {
        Self::Gtc
    }
}

wire_enum! {
    /// Price source that arms a stop order.
    WorkingType, "working type" {
        ContractPrice => "CONTRACT_PRICE",
        MarkPrice => "MARK_PRICE",
    }
}

impl Default for WorkingType {
    fn default() -> Self {
        Self::ContractPrice
    }
}

wire_enum! {
    /// Level of detail requested in the order response.
    ResponseType, "response type" {
        Ack => "ACK",
        Result => "RESULT",
    }
}
