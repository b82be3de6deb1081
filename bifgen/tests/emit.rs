extern crate bifgen;

use bifgen::config::StanzaMode;
use bifgen::tester::Tester;
use bifgen::Options;
use indoc::indoc;
use std::panic::Location;

const BIFS: &str = indoc! {"
    [altivec]
      const vsc __builtin_altivec_abs_v16qi (vsc);
        ABS_V16QI absv16qi2 {}
      const vss __builtin_altivec_abs_v8hi (vss);
        ABS_V8HI absv8hi2 {}
      vsi __builtin_altivec_vsldoi_4si (vsi, vsi, const int<4>);
        VSLDOI_4SI altivec_vsldoi_v4si {}

    [power8-vector]
      pure vsll __builtin_altivec_lvx_v2di (signed long long, void *);
        LVX_V2DI altivec_lvx_v2di {ldvec, ldstmask}
"};

const OVLDS: &str = indoc! {"
    [VEC_ABS, vec_abs, __builtin_vec_abs]
      vsc __builtin_vec_abs (vsc);
        ABS_V16QI
      vss __builtin_vec_abs (vss);
        ABS_V8HI

    [VEC_SLD, vec_sld, __builtin_vec_sld]
      vsi __builtin_vec_sld (vsi, vsi, const int);
        VSLDOI_4SI
"};

#[test]
fn header_enumerations() {
    Tester::init_tracing();
    let generated = Tester::generate(BIFS, OVLDS).unwrap();
    let expected = indoc! {"
        enum rs6000_gen_builtins
        {
          RS6000_BIF_NONE,
          RS6000_BIF_ABS_V16QI,
          RS6000_BIF_ABS_V8HI,
          RS6000_BIF_LVX_V2DI,
          RS6000_BIF_VSLDOI_4SI,
          RS6000_BIF_MAX
        };
    "};
    assert!(generated.header.contains(expected), "{}", generated.header);

    let expected = indoc! {"
        enum rs6000_gen_overloads
        {
          RS6000_OVLD_NONE = RS6000_BIF_MAX + 1,
          RS6000_OVLD_ABS_V16QI,
          RS6000_OVLD_ABS_V8HI,
          RS6000_OVLD_VSLDOI_4SI,
          RS6000_OVLD_MAX
        };
    "};
    Tester::check_lines_contain(&generated.header, expected, Location::caller());
}

#[test]
fn header_declarations() {
    Tester::init_tracing();
    let generated = Tester::generate(BIFS, OVLDS).unwrap();
    let expected = indoc! {"
        /* Automatically generated by the program 'rs6000-gen-builtins'
           from the files 'bif.def' and 'ovld.def'.  */
        #include \"config.h\"
        enum bif_enable
          ENB_ALWAYS,
          ENB_MMA
        struct bifdata
          bif_enable enable;
          int  restr_opnd[2];
        #define bif_init_bit\t\t(0x00000001)
        #define bif_is_predicate(x)\t((x).bifattrs & bif_pred_bit)
        extern bifdata rs6000_builtin_info[RS6000_BIF_MAX];
        struct rs6000_bif_hasher : nofree_ptr_hash<bifdata>
        extern hash_table<rs6000_bif_hasher> bif_hash;
        extern ovlddata rs6000_overload_info[RS6000_OVLD_MAX - RS6000_OVLD_NONE];
        extern void rs6000_autoinit_builtins ();
        extern tree v16qi_ftype_v16qi;
        extern tree v2di_ftype_di_pv;
        extern tree v4si_ftype_v4si_v4si_si;
        extern tree v8hi_ftype_v8hi;
    "};
    Tester::check_lines_contain(&generated.header, expected, Location::caller());
}

#[test]
fn init_rows() {
    Tester::init_tracing();
    let generated = Tester::generate(BIFS, OVLDS).unwrap();
    let expected = indoc! {"
        #include \"rs6000-builtins.h\"
        bifdata rs6000_builtin_info[RS6000_BIF_MAX];
        hash_table<rs6000_bif_hasher> bif_hash (1024);
        tree v16qi_ftype_v16qi;
        void
        rs6000_autoinit_builtins ()
        {
          rs6000_builtin_info[RS6000_BIF_ABS_V16QI].bifname = \"__builtin_altivec_abs_v16qi\";
          rs6000_builtin_info[RS6000_BIF_ABS_V16QI].enable = ENB_ALTIVEC;
          rs6000_builtin_info[RS6000_BIF_ABS_V16QI].kind = FNK_CONST;
          rs6000_builtin_info[RS6000_BIF_ABS_V16QI].fntype = v16qi_ftype_v16qi;
          rs6000_builtin_info[RS6000_BIF_ABS_V16QI].icode = CODE_FOR_absv16qi2;
          rs6000_builtin_info[RS6000_BIF_ABS_V16QI].nargs = 1;
          rs6000_builtin_info[RS6000_BIF_ABS_V16QI].bifattrs = 0;
          slot = bif_hash.find_slot_with_hash (
                   \"__builtin_altivec_abs_v16qi\", htab_hash_string (\"__builtin_altivec_abs_v16qi\"), INSERT);
          *slot = &rs6000_builtin_info[RS6000_BIF_ABS_V16QI];
          rs6000_builtin_info[RS6000_BIF_VSLDOI_4SI].restr_opnd[0] = 3;
          rs6000_builtin_info[RS6000_BIF_VSLDOI_4SI].restr[0] = RES_BITS;
          rs6000_builtin_info[RS6000_BIF_VSLDOI_4SI].restr_val1[0] = 4;
          rs6000_builtin_info[RS6000_BIF_LVX_V2DI].enable = ENB_P8V;
          rs6000_builtin_info[RS6000_BIF_LVX_V2DI].kind = FNK_PURE;
          rs6000_builtin_info[RS6000_BIF_LVX_V2DI].bifattrs = bif_ldvec_bit | bif_ldstmask_bit;
        }
    "};
    Tester::check_lines_contain(&generated.init, expected, Location::caller());
    assert!(!generated.init.contains("RS6000_BIF_VSLDOI_4SI].restr_val2"));
}

#[test]
fn init_overload_chains() {
    Tester::init_tracing();
    let generated = Tester::generate(BIFS, OVLDS).unwrap();
    let expected = indoc! {"
          rs6000_overload_info[RS6000_OVLD_ABS_V16QI - RS6000_OVLD_NONE].bifname = \"__builtin_vec_abs\";
          rs6000_overload_info[RS6000_OVLD_ABS_V16QI - RS6000_OVLD_NONE].bifid = RS6000_BIF_ABS_V16QI;
          rs6000_overload_info[RS6000_OVLD_ABS_V16QI - RS6000_OVLD_NONE].fntype = v16qi_ftype_v16qi;
          rs6000_overload_info[RS6000_OVLD_ABS_V16QI - RS6000_OVLD_NONE].next = &rs6000_overload_info[RS6000_OVLD_ABS_V8HI - RS6000_OVLD_NONE];
          *oslot = &rs6000_overload_info[RS6000_OVLD_ABS_V16QI - RS6000_OVLD_NONE];
          rs6000_overload_info[RS6000_OVLD_ABS_V8HI - RS6000_OVLD_NONE].next = NULL;
          rs6000_overload_info[RS6000_OVLD_VSLDOI_4SI - RS6000_OVLD_NONE].fntype = v4si_ftype_v4si_v4si_si;
          rs6000_overload_info[RS6000_OVLD_VSLDOI_4SI - RS6000_OVLD_NONE].next = NULL;
          *oslot = &rs6000_overload_info[RS6000_OVLD_VSLDOI_4SI - RS6000_OVLD_NONE];
    "};
    Tester::check_lines_contain(&generated.init, expected, Location::caller());
    assert_eq!(generated.init.matches("*oslot = ").count(), 2);
    assert_eq!(generated.init.matches("*slot = ").count(), 4);
}

#[test]
fn defines() {
    Tester::init_tracing();
    let generated = Tester::generate(BIFS, OVLDS).unwrap();
    let expected = indoc! {"
        #define vec_abs __builtin_vec_abs
        #define vec_sld __builtin_vec_sld
    "};
    Tester::check_lines_exact(&generated.defines, expected, Location::caller());
}

#[test]
fn empty_inputs() {
    Tester::init_tracing();
    let generated = Tester::generate("", "").unwrap();
    let expected = indoc! {"
        enum rs6000_gen_builtins
        {
          RS6000_BIF_NONE,
          RS6000_BIF_MAX
        };
    "};
    assert!(generated.header.contains(expected), "{}", generated.header);
    let expected = indoc! {"
        enum rs6000_gen_overloads
        {
          RS6000_OVLD_NONE = RS6000_BIF_MAX + 1,
          RS6000_OVLD_MAX
        };
    "};
    assert!(generated.header.contains(expected), "{}", generated.header);
    assert!(!generated.header.contains("extern tree"));

    let expected = indoc! {"
        rs6000_autoinit_builtins ()
        {
          bifdata **slot;
          ovlddata **oslot;

        }
    "};
    assert!(generated.init.contains(expected), "{}", generated.init);
    assert!(!generated.init.contains("tree "));
    assert_eq!(generated.defines, "");
}

#[test]
fn free_form_enable_conditions() {
    Tester::init_tracing();
    let bif = indoc! {"
        [TARGET_ALTIVEC && TARGET_64BIT]
          void __builtin_nop ();
            NOP nop {}
    "};
    let options = Options {
        stanza_mode: StanzaMode::FreeForm,
        ..Options::default()
    };
    let generated = Tester::generate_with(bif, "", &options).unwrap();
    assert!(!generated.header.contains("enum bif_enable"));
    assert!(generated.header.contains("  int enable;\n"));
    let expected = indoc! {"
        rs6000_builtin_info[RS6000_BIF_NOP].enable = (TARGET_ALTIVEC && TARGET_64BIT);
        rs6000_builtin_info[RS6000_BIF_NOP].fntype = v_ftype_v;
        rs6000_builtin_info[RS6000_BIF_NOP].nargs = 0;
    "};
    Tester::check_lines_contain(&generated.init, expected, Location::caller());
}

#[test]
fn output_is_deterministic() {
    Tester::init_tracing();
    let first = Tester::generate(BIFS, OVLDS).unwrap();
    let second = Tester::generate(BIFS, OVLDS).unwrap();
    assert_eq!(first.header, second.header);
    assert_eq!(first.init, second.init);
    assert_eq!(first.defines, second.defines);
}
