fn main() {
    #[cfg(feature = "gui")]
    slint_build::compile("src/frontend/gui/components/main.slint")
        .expect("Slint GUI コンポーネントの生成に失敗しました");
}
