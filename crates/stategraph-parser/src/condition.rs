//! Human readable summaries of choice rule conditions.
//!
//! A summary is the label drawn on a conditional edge. Rules that cannot be
//! rendered (unknown operator, several operators, no variable) get
//! [`PLACEHOLDER`], and so does any combinator that contains one.

use serde_json::{Map, Value};

/// Label used for conditions that cannot be summarized.
pub const PLACEHOLDER: &str = "→";

const TYPE_TESTS: [(&str, &str); 6] = [
    ("IsNull", "null"),
    ("IsPresent", "present"),
    ("IsNumeric", "numeric"),
    ("IsString", "string"),
    ("IsBoolean", "boolean"),
    ("IsTimestamp", "timestamp"),
];

const FAMILIES: [&str; 4] = ["String", "Numeric", "Boolean", "Timestamp"];

/// Summarizes a condition object, falling back to [`PLACEHOLDER`].
///
/// # Examples
///
/// ```
/// # use serde_json::json;
/// # use stategraph_parser::condition::summarize;
/// let rule = json!({"Variable": "$.total", "NumericGreaterThan": 100});
/// assert_eq!(summarize(rule.as_object().unwrap()), "$.total > 100");
/// ```
pub fn summarize(condition: &Map<String, Value>) -> String {
    render(condition).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn render(condition: &Map<String, Value>) -> Option<String> {
    if let Some(Value::String(expression)) = condition.get("Condition") {
        return Some(expression.clone());
    }
    if let Some(rules) = condition.get("And") {
        return render_all(rules, " && ");
    }
    if let Some(rules) = condition.get("Or") {
        return render_all(rules, " || ");
    }
    if let Some(rule) = condition.get("Not") {
        return Some(format!("!({})", render(rule.as_object()?)?));
    }
    render_comparison(condition)
}

fn render_all(rules: &Value, separator: &str) -> Option<String> {
    let parts = rules
        .as_array()?
        .iter()
        .map(|rule| render(rule.as_object()?))
        .collect::<Option<Vec<_>>>()?;
    if parts.is_empty() {
        return None;
    }
    Some(format!("({})", parts.join(separator)))
}

fn render_comparison(condition: &Map<String, Value>) -> Option<String> {
    let variable = condition.get("Variable")?.as_str()?;
    let mut operators = condition
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "Variable" | "Comment"));
    let (operator, operand) = operators.next()?;
    if operators.next().is_some() {
        return None;
    }

    if let Some((_, test)) = TYPE_TESTS.iter().find(|(name, _)| *name == operator.as_str()) {
        return match operand.as_bool()? {
            true => Some(format!("{variable} is {test}")),
            false => Some(format!("{variable} is not {test}")),
        };
    }

    let (symbol, is_path) = comparison_symbol(operator)?;
    let rhs = if is_path {
        operand.as_str()?.to_string()
    } else {
        operand.to_string()
    };
    Some(format!("{variable} {symbol} {rhs}"))
}

/// Maps an operator name to its symbol and whether the operand is a path.
fn comparison_symbol(operator: &str) -> Option<(&'static str, bool)> {
    let (base, is_path) = match operator.strip_suffix("Path") {
        Some(base) => (base, true),
        None => (operator, false),
    };
    if base == "StringMatches" {
        return (!is_path).then_some(("matches", false));
    }

    let family = FAMILIES.iter().find(|family| base.starts_with(*family))?;
    let relation = &base[family.len()..];
    let symbol = match relation {
        "Equals" => "==",
        "LessThan" => "<",
        "GreaterThan" => ">",
        "LessThanEquals" => "<=",
        "GreaterThanEquals" => ">=",
        _ => return None,
    };
    if *family == "Boolean" && symbol != "==" {
        return None;
    }
    Some((symbol, is_path))
}
