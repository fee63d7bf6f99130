//! Assembling source programs, running the result, and round-tripping
//! assembled bytes through the disassembler and back.
use z80tools::{Assembler, CpuStateDelta, Disassembler, Machine};

#[test]
fn forward_reference_resolves_in_pass_2() {
    let out = Assembler::new().assemble(concat!(
        " ORG 8000h\n",
        " LD HL, L1\n",
        " RET\n",
        "L1: DB 42h\n",
    ));
    assert!(out.success, "{:?}", out.errors);
    assert_eq!(out.origin, 0x8000);
    assert_eq!(out.bytes, [0x21, 0x04, 0x80, 0xC9, 0x42]);
    assert_eq!(out.data_segments, [(0x8004, 1)]);
}

#[test]
fn assembled_program_runs_on_the_machine() {
    let out = Assembler::new().assemble(concat!(
        "      ORG 1000h\n",
        "      LD B, 10h      ; loop counter\n",
        "      LD HL, TABLE\n",
        "      LD A, 0\n",
        "FILL: LD (HL), A\n",
        "      INC HL\n",
        "      ADD A, 3\n",
        "      DJNZ FILL\n",
        "      RET\n",
        "TABLE: DS 16\n",
    ));
    assert!(out.success, "{:?}", out.errors);
    let mut machine = Machine::new();
    machine.load_executable(&out.bytes, out.origin, true).unwrap();
    machine.set_cpu_state(CpuStateDelta { sp: Some(0x4000), ..CpuStateDelta::default() });
    machine.execute().unwrap();
    let table: Vec<u8> = (0..16u8).map(|i| i.wrapping_mul(3)).collect();
    let table_addr = out.origin + (out.bytes.len() - 16) as u16;
    assert_eq!(machine.dump_memory(table_addr, 16), &table[..]);
}

#[test]
fn disassembled_text_reassembles_to_the_same_bytes() {
    let source = concat!(
        " ORG 4000h\n",
        " LD BC, 1234h\n",
        " LD A, (IX+5)\n",
        " LD (IY-3), A\n",
        " SET 1, (IX+2)\n",
        " BIT 7, (HL)\n",
        " EX AF, AF'\n",
        " SBC HL, DE\n",
        " IN A, (7)\n",
        " OUT (C), E\n",
        " RST 18h\n",
        " IM 1\n",
        " JR NZ, 4000h\n",
        " DJNZ 4000h\n",
        " CALL 1234h\n",
        " JP (IX)\n",
        " LDIR\n",
        " RET\n",
    );
    let asm = Assembler::new();
    let first = asm.assemble(source);
    assert!(first.success, "{:?}", first.errors);

    let mut machine = Machine::new();
    machine.load_data(&first.bytes, first.origin, true).unwrap();
    let lines = Disassembler::new(&machine, first.origin, first.bytes.len())
        .disassemble();

    let mut rebuilt = format!(" ORG {:04X}h\n", first.origin);
    for (_, text) in &lines {
        rebuilt.push_str(" ");
        rebuilt.push_str(text);
        rebuilt.push('\n');
    }
    let second = asm.assemble(&rebuilt);
    assert!(second.success, "{:?}\nsource:\n{}", second.errors, rebuilt);
    assert_eq!(second.bytes, first.bytes, "round trip:\n{}", rebuilt);
}

#[test]
fn data_segments_feed_the_disassembler() {
    let out = Assembler::new().assemble(concat!(
        " ORG 2000h\n",
        " LD HL, MSG\n",
        " RET\n",
        "MSG: DM \"HI\"\n",
        " NOP\n",
    ));
    assert!(out.success, "{:?}", out.errors);
    let mut machine = Machine::new();
    machine.load_data(&out.bytes, out.origin, true).unwrap();
    let mut disasm = Disassembler::new(&machine, out.origin, out.bytes.len());
    for (address, len) in &out.data_segments {
        disasm.add_non_executable_section(*address, *len);
    }
    let lines = disasm.disassemble();
    let texts: Vec<&str> = lines.iter().map(|(_, t)| t.as_str()).collect();
    assert_eq!(texts, ["LD HL,2004h", "RET", "DB 48h, 49h", "NOP"]);
}

#[test]
fn errors_carry_line_numbers() {
    let out = Assembler::new().assemble(" NOP\n BAD X\n NOP\n LD A, (IX+500)\n");
    assert!(!out.success);
    assert_eq!(out.errors.len(), 2);
    assert_eq!(out.errors[0].line, 2);
    assert_eq!(out.errors[1].line, 4);
}
