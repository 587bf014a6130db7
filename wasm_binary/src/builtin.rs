//! Opcode tables: the structural opcodes the encoder emits itself, and the
//! fixed name-to-opcode mapping for the builtin subset used by the runtime
//! support library.

pub(crate) const UNREACHABLE: u8 = 0x00;
pub(crate) const BLOCK: u8 = 0x02;
pub(crate) const LOOP: u8 = 0x03;
pub(crate) const IF: u8 = 0x04;
pub(crate) const ELSE: u8 = 0x05;
pub(crate) const END: u8 = 0x0b;
pub(crate) const CALL: u8 = 0x10;
pub(crate) const LOCAL_GET: u8 = 0x20;
pub(crate) const LOCAL_SET: u8 = 0x21;
pub(crate) const GLOBAL_GET: u8 = 0x23;
pub(crate) const GLOBAL_SET: u8 = 0x24;
pub(crate) const I64_CONST: u8 = 0x42;

/// Alignment exponent and offset for every load and store. Neither is
/// parameterizable from the IR.
pub(crate) const MEM_IMMEDIATE: [u8; 2] = [3, 0];

pub(crate) fn has_memory_immediate(name: &str) -> bool {
    name.contains(".load") || name.contains(".store")
}

pub(crate) fn opcode_of(name: &str) -> Option<u8> {
    Some(match name {
        "i32.load" => 0x28,
        "i64.load" => 0x29,
        "i32.load8_s" => 0x2c,
        "i32.load8_u" => 0x2d,
        "i32.load16_s" => 0x2e,
        "i32.load16_u" => 0x2f,
        "i64.load8_s" => 0x30,
        "i64.load8_u" => 0x31,
        "i64.load16_s" => 0x32,
        "i64.load16_u" => 0x33,
        "i64.load32_s" => 0x34,
        "i64.load32_u" => 0x35,
        "i32.store" => 0x36,
        "i64.store" => 0x37,
        "i32.store8" => 0x3a,
        "i32.store16" => 0x3b,
        "i64.store8" => 0x3c,
        "i64.store16" => 0x3d,
        "i64.store32" => 0x3e,
        "memory.size" => 0x3f,
        "memory.grow" => 0x40,
        "i32.eqz" => 0x45,
        "i32.eq" => 0x46,
        "i32.ne" => 0x47,
        "i32.lt_s" => 0x48,
        "i32.lt_u" => 0x49,
        "i32.gt_s" => 0x4a,
        "i32.gt_u" => 0x4b,
        "i32.le_s" => 0x4c,
        "i32.le_u" => 0x4d,
        "i32.ge_s" => 0x4e,
        "i32.ge_u" => 0x4f,
        "i64.eqz" => 0x50,
        "i64.eq" => 0x51,
        "i64.ne" => 0x52,
        "i64.lt_s" => 0x53,
        "i64.lt_u" => 0x54,
        "i64.gt_s" => 0x55,
        "i64.gt_u" => 0x56,
        "i64.le_s" => 0x57,
        "i64.le_u" => 0x58,
        "i64.ge_s" => 0x59,
        "i64.ge_u" => 0x5a,
        "i32.clz" => 0x67,
        "i32.ctz" => 0x68,
        "i32.popcnt" => 0x69,
        "i32.add" => 0x6a,
        "i32.sub" => 0x6b,
        "i32.mul" => 0x6c,
        "i32.div_s" => 0x6d,
        "i32.div_u" => 0x6e,
        "i32.rem_s" => 0x6f,
        "i32.rem_u" => 0x70,
        "i32.and" => 0x71,
        "i32.or" => 0x72,
        "i32.xor" => 0x73,
        "i32.shl" => 0x74,
        "i32.shr_s" => 0x75,
        "i32.shr_u" => 0x76,
        "i32.rotl" => 0x77,
        "i32.rotr" => 0x78,
        "i64.clz" => 0x79,
        "i64.ctz" => 0x7a,
        "i64.popcnt" => 0x7b,
        "i64.add" => 0x7c,
        "i64.sub" => 0x7d,
        "i64.mul" => 0x7e,
        "i64.div_s" => 0x7f,
        "i64.div_u" => 0x80,
        "i64.rem_s" => 0x81,
        "i64.rem_u" => 0x82,
        "i64.and" => 0x83,
        "i64.or" => 0x84,
        "i64.xor" => 0x85,
        "i64.shl" => 0x86,
        "i64.shr_s" => 0x87,
        "i64.shr_u" => 0x88,
        "i64.rotl" => 0x89,
        "i64.rotr" => 0x8a,
        "i32.wrap_i64" => 0xa7,
        "i64.extend_i32_s" => 0xac,
        "i64.extend_i32_u" => 0xad,
        _ => return None,
    })
}
