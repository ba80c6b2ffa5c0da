// crates/ib_foundation/src/record.rs

//! 二进制记录编解码
//!
//! 重启文件和时间推进器检查点共用同一种记录布局（小端序）：
//!
//! ```text
//! [魔数: 4 bytes]
//! [版本: u32]
//! [载荷: 由调用方按顺序写入]
//! [CRC32: u32]  覆盖之前的全部字节
//! ```
//!
//! 写入先落到临时文件，成功后重命名（原子替换）。
//! 读取时依次校验长度、CRC、魔数和版本，任何越界读取都返回错误而不是 panic。
//!
//! # 使用示例
//!
//! ```
//! use ib_foundation::record::{RecordReader, RecordWriter};
//!
//! let mut writer = RecordWriter::new(b"TEST", 1);
//! writer.put_f64(0.5);
//! writer.put_f64_slice(&[1.0, 2.0]);
//! let bytes = writer.into_bytes();
//!
//! let mut reader = RecordReader::from_bytes(bytes, b"TEST", 1).unwrap();
//! assert_eq!(reader.get_f64().unwrap(), 0.5);
//! assert_eq!(reader.get_f64_vec().unwrap(), vec![1.0, 2.0]);
//! reader.finish().unwrap();
//! ```

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{IbError, IbResult};

/// 头部长度：魔数 + 版本
const HEADER_LEN: usize = 8;

/// 尾部长度：CRC32
const CRC_LEN: usize = 4;

// ============================================================
// 写入
// ============================================================

/// 二进制记录写入器
#[derive(Debug, Clone)]
pub struct RecordWriter {
    data: Vec<u8>,
}

impl RecordWriter {
    /// 以魔数和版本号开始一条记录
    pub fn new(magic: &[u8; 4], version: u32) -> Self {
        let mut data = Vec::with_capacity(256);
        data.extend_from_slice(magic);
        data.extend_from_slice(&version.to_le_bytes());
        Self { data }
    }

    /// 写入单字节
    pub fn put_u8(&mut self, value: u8) -> &mut Self {
        self.data.push(value);
        self
    }

    /// 写入 u64
    pub fn put_u64(&mut self, value: u64) -> &mut Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// 写入 usize（按 u64 存储）
    pub fn put_usize(&mut self, value: usize) -> &mut Self {
        self.put_u64(value as u64)
    }

    /// 写入 f64
    pub fn put_f64(&mut self, value: f64) -> &mut Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// 写入带长度前缀的 f64 数组
    pub fn put_f64_slice(&mut self, values: &[f64]) -> &mut Self {
        self.put_usize(values.len());
        self.data.reserve(values.len() * 8);
        for &v in values {
            self.data.extend_from_slice(&v.to_le_bytes());
        }
        self
    }

    /// 写入带长度前缀的 UTF-8 字符串
    pub fn put_str(&mut self, value: &str) -> &mut Self {
        self.put_usize(value.len());
        self.data.extend_from_slice(value.as_bytes());
        self
    }

    /// 结束记录，追加 CRC32 并返回完整字节
    pub fn into_bytes(mut self) -> Vec<u8> {
        let crc = crc32(&self.data);
        self.data.extend_from_slice(&crc.to_le_bytes());
        self.data
    }

    /// 结束记录并写入文件（临时文件 + 重命名）
    pub fn write_to(self, path: &Path) -> IbResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    IbError::io_with_source(format!("无法创建目录 {}", parent.display()), e)
                })?;
            }
        }

        let temp_path = temp_path_for(path);
        let bytes = self.into_bytes();
        {
            let file = File::create(&temp_path).map_err(|e| {
                IbError::io_with_source(format!("无法创建 {}", temp_path.display()), e)
            })?;
            let mut writer = BufWriter::new(file);
            writer.write_all(&bytes)?;
            writer.flush()?;
        }

        std::fs::rename(&temp_path, path).map_err(|e| {
            IbError::io_with_source(format!("无法重命名为 {}", path.display()), e)
        })?;
        Ok(())
    }
}

/// 临时文件路径：在完整文件名后追加 `.tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

// ============================================================
// 读取
// ============================================================

/// 二进制记录读取器
#[derive(Debug, Clone)]
pub struct RecordReader {
    data: Vec<u8>,
    offset: usize,
    version: u32,
}

impl RecordReader {
    /// 从文件读取并校验记录
    pub fn open(path: &Path, magic: &[u8; 4], max_version: u32) -> IbResult<Self> {
        if !path.exists() {
            return Err(IbError::file_not_found(path));
        }
        let bytes = std::fs::read(path)
            .map_err(|e| IbError::io_with_source(format!("无法读取 {}", path.display()), e))?;
        Self::from_bytes(bytes, magic, max_version)
    }

    /// 从内存字节校验记录
    pub fn from_bytes(mut bytes: Vec<u8>, magic: &[u8; 4], max_version: u32) -> IbResult<Self> {
        if bytes.len() < HEADER_LEN + CRC_LEN {
            return Err(IbError::format(format!("记录太短: {} 字节", bytes.len())));
        }

        let crc_offset = bytes.len() - CRC_LEN;
        let mut crc_bytes = [0u8; 4];
        crc_bytes.copy_from_slice(&bytes[crc_offset..]);
        let stored = u32::from_le_bytes(crc_bytes);
        bytes.truncate(crc_offset);

        let computed = crc32(&bytes);
        if stored != computed {
            return Err(IbError::Checksum {
                expected: stored,
                found: computed,
            });
        }

        if &bytes[..4] != magic {
            return Err(IbError::format(format!(
                "魔数不匹配: 期望 {:?}, 实际 {:?}",
                String::from_utf8_lossy(magic),
                String::from_utf8_lossy(&bytes[..4])
            )));
        }

        let mut version_bytes = [0u8; 4];
        version_bytes.copy_from_slice(&bytes[4..8]);
        let version = u32::from_le_bytes(version_bytes);
        if version == 0 || version > max_version {
            return Err(IbError::Version {
                file: version,
                current: max_version,
            });
        }

        Ok(Self {
            data: bytes,
            offset: HEADER_LEN,
            version,
        })
    }

    /// 文件中的版本号
    pub fn version(&self) -> u32 {
        self.version
    }

    /// 尚未读取的载荷字节数
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, n: usize) -> IbResult<&[u8]> {
        if n > self.remaining() {
            return Err(IbError::format(format!(
                "记录截断: 偏移 {} 处需要 {} 字节, 剩余 {}",
                self.offset,
                n,
                self.remaining()
            )));
        }
        let start = self.offset;
        self.offset += n;
        Ok(&self.data[start..start + n])
    }

    fn take_array<const N: usize>(&mut self) -> IbResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// 读取单字节
    pub fn get_u8(&mut self) -> IbResult<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    /// 读取 u64
    pub fn get_u64(&mut self) -> IbResult<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// 读取 usize（按 u64 存储）
    pub fn get_usize(&mut self) -> IbResult<usize> {
        let value = self.get_u64()?;
        usize::try_from(value).map_err(|_| IbError::format(format!("长度溢出: {value}")))
    }

    /// 读取 f64
    pub fn get_f64(&mut self) -> IbResult<f64> {
        Ok(f64::from_le_bytes(self.take_array()?))
    }

    /// 读取带长度前缀的 f64 数组
    pub fn get_f64_vec(&mut self) -> IbResult<Vec<f64>> {
        let len = self.get_usize()?;
        if len > self.remaining() / 8 {
            return Err(IbError::format(format!(
                "数组长度 {} 超出剩余数据 {} 字节",
                len,
                self.remaining()
            )));
        }
        let bytes = self.take(len * 8)?;
        Ok(bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut b = [0u8; 8];
                b.copy_from_slice(chunk);
                f64::from_le_bytes(b)
            })
            .collect())
    }

    /// 读取指定长度的 f64 数组，长度不符时报错
    pub fn get_f64_vec_exact(&mut self, name: &'static str, expected: usize) -> IbResult<Vec<f64>> {
        let values = self.get_f64_vec()?;
        IbError::check_size(name, expected, values.len())?;
        Ok(values)
    }

    /// 读取带长度前缀的 UTF-8 字符串
    pub fn get_string(&mut self) -> IbResult<String> {
        let len = self.get_usize()?;
        let bytes = self.take(len)?.to_vec();
        String::from_utf8(bytes).map_err(|e| IbError::format(format!("无效的 UTF-8 字符串: {e}")))
    }

    /// 确认载荷已全部读取
    pub fn finish(self) -> IbResult<()> {
        if self.remaining() != 0 {
            return Err(IbError::format(format!(
                "记录末尾有 {} 字节未解析",
                self.remaining()
            )));
        }
        Ok(())
    }
}

// ============================================================
// CRC32
// ============================================================

/// 计算 CRC32 校验和（IEEE 多项式）
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        let index = ((crc ^ byte as u32) & 0xFF) as usize;
        crc = CRC32_TABLE[index] ^ (crc >> 8);
    }
    !crc
}

/// 生成 CRC32 查找表（编译期计算）
const fn generate_crc32_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = 0xEDB8_8320 ^ (crc >> 1);
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

const CRC32_TABLE: [u32; 256] = generate_crc32_table();

// ============================================================
// 测试
// ============================================================
