//! Disassembling a mixed image of code and a declared data island.
use z80tools::{Disassembler, Machine};

const IMAGE: [u8; 50] = [
    // 17 bytes of code
    0x37,                   // 1000h SCF
    0x3F,                   // 1001h CCF
    0xDD, 0x7E, 0x00,       // 1002h LD A,(IX)
    0xFD, 0x8E, 0x00,       // 1005h ADC A,(IY)
    0x77,                   // 1008h LD (HL),A
    0xDD, 0x2B,             // 1009h DEC IX
    0xFD, 0x2B,             // 100Bh DEC IY
    0x2B,                   // 100Dh DEC HL
    0x10, 0xF2,             // 100Eh DJNZ 1002h
    0xC9,                   // 1010h RET
    // 10 bytes of data
    0x11, 0x22, 0x22, 0x33, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA,
    // 23 bytes of code
    0x21, 0x00, 0x00,       // 101Bh LD HL,0000h
    0x3E, 0x10,             // 101Eh LD A,10h
    0xCB, 0x21,             // 1020h SLA C
    0xCB, 0x10,             // 1022h RL B
    0xED, 0x6A,             // 1024h ADC HL,HL
    0xED, 0x52,             // 1026h SBC HL,DE
    0x38, 0x03,             // 1028h JR C,102Dh
    0x0C,                   // 102Ah INC C
    0x18, 0x01,             // 102Bh JR 102Eh
    0x19,                   // 102Dh ADD HL,DE
    0x3D,                   // 102Eh DEC A
    0x20, 0xEF,             // 102Fh JR NZ,1020h
    0xC9,                   // 1031h RET
];

#[test]
fn code_with_a_data_island() {
    let mut machine = Machine::new();
    machine.load_data(&IMAGE, 0x1000, true).unwrap();
    let mut disasm = Disassembler::new(&machine, 0x1000, IMAGE.len());
    disasm.add_non_executable_section(0x1011, 0x000A);
    let lines = disasm.disassemble();
    let expected: [(u16, &str); 24] = [
        (0x1000, "SCF"),
        (0x1001, "CCF"),
        (0x1002, "LD A,(IX)"),
        (0x1005, "ADC A,(IY)"),
        (0x1008, "LD (HL),A"),
        (0x1009, "DEC IX"),
        (0x100B, "DEC IY"),
        (0x100D, "DEC HL"),
        (0x100E, "DJNZ 1002h"),
        (0x1010, "RET"),
        (0x1011, "DB 11h, 22h, 22h, 33h, 55h, 66h, 77h, 88h, 99h, AAh"),
        (0x101B, "LD HL,0000h"),
        (0x101E, "LD A,10h"),
        (0x1020, "SLA C"),
        (0x1022, "RL B"),
        (0x1024, "ADC HL,HL"),
        (0x1026, "SBC HL,DE"),
        (0x1028, "JR C,102Dh"),
        (0x102A, "INC C"),
        (0x102B, "JR 102Eh"),
        (0x102D, "ADD HL,DE"),
        (0x102E, "DEC A"),
        (0x102F, "JR NZ,1020h"),
        (0x1031, "RET"),
    ];
    assert_eq!(lines.len(), expected.len());
    for ((addr, text), (want_addr, want_text)) in lines.iter().zip(expected) {
        assert_eq!((*addr, text.as_str()), (want_addr, want_text));
    }
}

#[test]
fn removing_the_island_decodes_it_as_code() {
    let mut machine = Machine::new();
    machine.load_data(&IMAGE, 0x1000, true).unwrap();
    let mut disasm = Disassembler::new(&machine, 0x1011, 4);
    disasm.add_non_executable_section(0x1011, 0x000A);
    assert_eq!(disasm.disassemble()[0].1, "DB 11h, 22h, 22h, 33h");
    disasm.remove_non_executable_section(0).unwrap();
    let lines = disasm.disassemble();
    // 11 22 22 is LD DE,2222h; 33 is INC SP
    assert_eq!(lines[0].1, "LD DE,2222h");
    assert_eq!(lines[1].1, "INC SP");
}
