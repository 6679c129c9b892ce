fn main() {
    // Windows resource compilation for product name and optional icon
    #[cfg(windows)]
    {
        let mut res = winres::WindowsResource::new();
        res.set("ProductName", "BINGO Retail");
        res.set("FileDescription", "BINGO Retail desktop client");
        if std::path::Path::new("assets/bingo.ico").exists() {
            res.set_icon("assets/bingo.ico");
        }
        if let Err(e) = res.compile() {
            println!("cargo:warning=Windows resource compilation failed: {e}");
        }
    }
}
