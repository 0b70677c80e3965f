//! 增量 UTF-8 解码器
//!
//! 网络 chunk 的边界可能落在多字节字符中间。解码器把末尾不完整的字节序列
//! 留到下一个 chunk 再解码，而不是逐 chunk 独立解码后产生乱码。

/// 增量 UTF-8 解码器
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    /// 上一个 chunk 末尾尚未解码的字节（最多 3 个）
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解码一个 chunk
    ///
    /// 返回本次可以确定的文本；非法字节替换为 U+FFFD，
    /// 末尾不完整的序列保留到下次调用。
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut output = String::with_capacity(self.pending.len());
        let mut consumed = 0;

        while consumed < self.pending.len() {
            match std::str::from_utf8(&self.pending[consumed..]) {
                Ok(text) => {
                    output.push_str(text);
                    consumed = self.pending.len();
                }
                Err(err) => {
                    let valid_end = consumed + err.valid_up_to();
                    output.push_str(&String::from_utf8_lossy(
                        &self.pending[consumed..valid_end],
                    ));
                    consumed = valid_end;

                    match err.error_len() {
                        Some(invalid_len) => {
                            output.push(char::REPLACEMENT_CHARACTER);
                            consumed += invalid_len;
                        }
                        // 不完整的序列，等待后续字节
                        None => break,
                    }
                }
            }
        }

        self.pending.drain(..consumed);
        output
    }

    /// 流结束时调用，残留的字节按替换字符输出
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        text
    }

    /// 当前缓存的未解码字节数
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ascii_passthrough() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"data: hello\n"), "data: hello\n");
        assert_eq!(decoder.pending_len(), 0);
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn test_split_multibyte_character() {
        // "é" = C3 A9, "中" = E4 B8 AD
        let bytes = "é中".as_bytes();
        let mut decoder = Utf8StreamDecoder::new();

        assert_eq!(decoder.decode(&bytes[..1]), "");
        assert_eq!(decoder.pending_len(), 1);
        assert_eq!(decoder.decode(&bytes[1..3]), "é");
        assert_eq!(decoder.pending_len(), 1);
        assert_eq!(decoder.decode(&bytes[3..4]), "");
        assert_eq!(decoder.decode(&bytes[4..]), "中");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_split_four_byte_emoji() {
        let bytes = "a😀b".as_bytes();
        let mut decoder = Utf8StreamDecoder::new();
        let mut out = String::new();
        for byte in bytes {
            out.push_str(&decoder.decode(std::slice::from_ref(byte)));
        }
        out.push_str(&decoder.finish());
        assert_eq!(out, "a😀b");
    }

    #[test]
    fn test_invalid_bytes_replaced() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"ok\xFFok"), "ok\u{FFFD}ok");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_truncated_sequence_at_end_of_stream() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(&[b'x', 0xE4, 0xB8]), "x");
        assert_eq!(decoder.finish(), "\u{FFFD}");
        assert_eq!(decoder.pending_len(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// 任意切分方式下，增量解码结果都与整体解码一致
        #[test]
        fn prop_split_anywhere_matches_whole(
            text in "\\PC{0,40}",
            cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
        ) {
            let bytes = text.as_bytes();
            let mut positions: Vec<usize> = cuts.iter().map(|i| i.index(bytes.len() + 1)).collect();
            positions.sort_unstable();

            let mut decoder = Utf8StreamDecoder::new();
            let mut out = String::new();
            let mut start = 0;
            for pos in positions {
                out.push_str(&decoder.decode(&bytes[start..pos]));
                start = pos;
            }
            out.push_str(&decoder.decode(&bytes[start..]));
            out.push_str(&decoder.finish());

            prop_assert_eq!(out, text);
        }
    }
}
