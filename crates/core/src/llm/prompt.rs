use crate::domain::portfolio::StockFeature;

pub fn portfolio_prompt(features: &[StockFeature]) -> String {
    let stocks = features
        .iter()
        .enumerate()
        .map(|(i, f)| {
            format!(
                "Stock {}:\n- Returns: {}\n- Risk: {}\n- Sharpe Ratio: {}",
                i + 1,
                f.returns,
                f.risk,
                f.sharpe_ratio
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    [
        "You are a professional portfolio manager. Analyze the given stock features and suggest optimal portfolio weights.",
        "Given the following stock features:",
        stocks.as_str(),
        "",
        "Please analyze these stocks and suggest optimal portfolio weights that maximize the Sharpe Ratio while maintaining diversification.",
        "Return a single, valid JSON object with two keys:",
        "1.  \"weights\": An array of numbers that sum to 1.",
        "2.  \"analysis\": A brief string (2-3 sentences) explaining *why* you chose these weights, based on risk, returns, and diversification.",
        "",
        "Example:",
        "{",
        "  \"weights\": [0.4, 0.3, 0.3],",
        "  \"analysis\": \"I prioritized Stock 1 due to its high Sharpe Ratio, while balancing with Stocks 2 and 3 to reduce overall portfolio volatility.\"",
        "}",
        "",
    ]
    .join("\n")
}
