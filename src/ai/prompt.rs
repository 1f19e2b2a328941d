//! 分析用プロンプト

const INSTRUCTION: &str = "Please analyze the following file content. \
Explain what it does, suggest improvements, or identify potential bugs.";

/// ドキュメント全文をコードフェンスで囲んだプロンプトを作る
pub fn build_prompt(content: &str) -> String {
    format!("{}\n\n```\n{}\n```", INSTRUCTION, content)
}
