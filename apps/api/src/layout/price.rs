use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    #[default]
    Before,
    After,
}

/// Currency used to turn item prices into display strings.
///
/// Plain fixed-decimal output only; locale-specific grouping and separators are the
/// caller's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(default)]
    pub symbol_position: SymbolPosition,
}

fn default_decimals() -> u8 {
    2
}

impl Default for Currency {
    fn default() -> Self {
        Currency {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            decimals: 2,
            symbol_position: SymbolPosition::Before,
        }
    }
}

impl Currency {
    pub fn format(&self, amount: f64) -> String {
        let number = format!("{:.*}", self.decimals as usize, amount);
        match self.symbol_position {
            SymbolPosition::Before => format!("{}{}", self.symbol, number),
            SymbolPosition::After => format!("{} {}", number, self.symbol),
        }
    }
}
