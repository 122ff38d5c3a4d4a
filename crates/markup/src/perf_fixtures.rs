/// Repeating document fixture shared by benches.
pub fn make_blocks(blocks: usize) -> String {
    let block = "<div class=\"card\"><a href=\"/item\">item</a><img src=\"/i.png\" alt=\"i\"></div>\n";
    let mut out = String::with_capacity(blocks * block.len());
    for _ in 0..blocks {
        out.push_str(block);
    }
    out
}
