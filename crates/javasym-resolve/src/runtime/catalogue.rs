//! Built-in description of core runtime classes.
//!
//! Classes are written the way a class file would describe them: internal
//! names, JVM descriptors and generic signatures. Only a practical subset of
//! each class's members is listed.

use std::collections::HashMap;

use javasym_classfile::{
    parse_class_signature, parse_field_descriptor, parse_field_signature, parse_method_descriptor,
    parse_method_signature, ClassStub, FieldStub, InnerClassInfo, MethodStub, ACC_ABSTRACT, ACC_BRIDGE,
    ACC_FINAL, ACC_INTERFACE, ACC_PUBLIC, ACC_STATIC, ACC_SYNTHETIC, ACC_VARARGS,
};

use super::ClassLoader;

struct Member {
    flags: u16,
    name: &'static str,
    descriptor: &'static str,
    signature: Option<&'static str>,
}

const fn member(flags: u16, name: &'static str, descriptor: &'static str) -> Member {
    Member {
        flags,
        name,
        descriptor,
        signature: None,
    }
}

const fn generic(flags: u16, name: &'static str, descriptor: &'static str, signature: &'static str) -> Member {
    Member {
        flags,
        name,
        descriptor,
        signature: Some(signature),
    }
}

struct Class {
    name: &'static str,
    flags: u16,
    super_class: Option<&'static str>,
    interfaces: &'static [&'static str],
    signature: Option<&'static str>,
    fields: &'static [Member],
    methods: &'static [Member],
    /// `(inner, outer, simple name, flags)` entries of the InnerClasses table.
    inner_classes: &'static [(&'static str, &'static str, &'static str, u16)],
}

const CLASS: u16 = ACC_PUBLIC;
const FINAL_CLASS: u16 = ACC_PUBLIC | ACC_FINAL;
const ABSTRACT_CLASS: u16 = ACC_PUBLIC | ACC_ABSTRACT;
const INTERFACE: u16 = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;

const P: u16 = ACC_PUBLIC;
const PS: u16 = ACC_PUBLIC | ACC_STATIC;
const PSF: u16 = ACC_PUBLIC | ACC_STATIC | ACC_FINAL;
const PA: u16 = ACC_PUBLIC | ACC_ABSTRACT;
const PSV: u16 = ACC_PUBLIC | ACC_STATIC | ACC_VARARGS;
const PV: u16 = ACC_PUBLIC | ACC_VARARGS;
const BRIDGE: u16 = ACC_PUBLIC | ACC_BRIDGE | ACC_SYNTHETIC;

const OBJECT: &str = "java/lang/Object";

const MAP_ENTRY: (&str, &str, &str, u16) = (
    "java/util/Map$Entry",
    "java/util/Map",
    "Entry",
    ACC_PUBLIC | ACC_STATIC | ACC_INTERFACE | ACC_ABSTRACT,
);

const CLASSES: &[Class] = &[
    Class {
        name: "java/lang/Object",
        flags: CLASS,
        super_class: None,
        interfaces: &[],
        signature: None,
        fields: &[],
        methods: &[
            member(P, "<init>", "()V"),
            member(P, "equals", "(Ljava/lang/Object;)Z"),
            member(P, "hashCode", "()I"),
            member(P, "toString", "()Ljava/lang/String;"),
            generic(ACC_PUBLIC | ACC_FINAL, "getClass", "()Ljava/lang/Class;", "()Ljava/lang/Class<*>;"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/io/Serializable",
        flags: INTERFACE,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: None,
        fields: &[],
        methods: &[],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Cloneable",
        flags: INTERFACE,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: None,
        fields: &[],
        methods: &[],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Runnable",
        flags: INTERFACE,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: None,
        fields: &[],
        methods: &[member(PA, "run", "()V")],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Comparable",
        flags: INTERFACE,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: Some("<T:Ljava/lang/Object;>Ljava/lang/Object;"),
        fields: &[],
        methods: &[generic(PA, "compareTo", "(Ljava/lang/Object;)I", "(TT;)I")],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/CharSequence",
        flags: INTERFACE,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: None,
        fields: &[],
        methods: &[
            member(PA, "length", "()I"),
            member(PA, "charAt", "(I)C"),
            member(PA, "subSequence", "(II)Ljava/lang/CharSequence;"),
            member(PA, "toString", "()Ljava/lang/String;"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Iterable",
        flags: INTERFACE,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: Some("<T:Ljava/lang/Object;>Ljava/lang/Object;"),
        fields: &[],
        methods: &[generic(PA, "iterator", "()Ljava/util/Iterator;", "()Ljava/util/Iterator<TT;>;")],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Class",
        flags: FINAL_CLASS,
        super_class: Some(OBJECT),
        interfaces: &["java/io/Serializable"],
        signature: Some("<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/io/Serializable;"),
        fields: &[],
        methods: &[
            member(P, "getName", "()Ljava/lang/String;"),
            member(P, "getSimpleName", "()Ljava/lang/String;"),
            generic(P, "cast", "(Ljava/lang/Object;)Ljava/lang/Object;", "(Ljava/lang/Object;)TT;"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/String",
        flags: FINAL_CLASS,
        super_class: Some(OBJECT),
        interfaces: &["java/io/Serializable", "java/lang/Comparable", "java/lang/CharSequence"],
        signature: Some(
            "Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/lang/String;>;Ljava/lang/CharSequence;",
        ),
        fields: &[],
        methods: &[
            member(P, "<init>", "()V"),
            member(P, "<init>", "(Ljava/lang/String;)V"),
            member(P, "<init>", "([C)V"),
            member(P, "length", "()I"),
            member(P, "isEmpty", "()Z"),
            member(P, "charAt", "(I)C"),
            member(P, "substring", "(I)Ljava/lang/String;"),
            member(P, "substring", "(II)Ljava/lang/String;"),
            member(P, "indexOf", "(I)I"),
            member(P, "indexOf", "(Ljava/lang/String;)I"),
            member(P, "concat", "(Ljava/lang/String;)Ljava/lang/String;"),
            member(P, "trim", "()Ljava/lang/String;"),
            member(P, "equals", "(Ljava/lang/Object;)Z"),
            member(P, "compareTo", "(Ljava/lang/String;)I"),
            member(BRIDGE, "compareTo", "(Ljava/lang/Object;)I"),
            member(P, "subSequence", "(II)Ljava/lang/CharSequence;"),
            member(P, "toString", "()Ljava/lang/String;"),
            member(PS, "valueOf", "(Ljava/lang/Object;)Ljava/lang/String;"),
            member(PS, "valueOf", "([C)Ljava/lang/String;"),
            member(PS, "valueOf", "(Z)Ljava/lang/String;"),
            member(PS, "valueOf", "(C)Ljava/lang/String;"),
            member(PS, "valueOf", "(I)Ljava/lang/String;"),
            member(PS, "valueOf", "(J)Ljava/lang/String;"),
            member(PS, "valueOf", "(D)Ljava/lang/String;"),
            member(PSV, "format", "(Ljava/lang/String;[Ljava/lang/Object;)Ljava/lang/String;"),
            member(
                PSV,
                "join",
                "(Ljava/lang/CharSequence;[Ljava/lang/CharSequence;)Ljava/lang/String;",
            ),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Number",
        flags: ABSTRACT_CLASS,
        super_class: Some(OBJECT),
        interfaces: &["java/io/Serializable"],
        signature: None,
        fields: &[],
        methods: &[
            member(P, "<init>", "()V"),
            member(PA, "intValue", "()I"),
            member(PA, "longValue", "()J"),
            member(PA, "floatValue", "()F"),
            member(PA, "doubleValue", "()D"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Boolean",
        flags: FINAL_CLASS,
        super_class: Some(OBJECT),
        interfaces: &["java/io/Serializable", "java/lang/Comparable"],
        signature: Some("Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/lang/Boolean;>;"),
        fields: &[
            member(PSF, "TRUE", "Ljava/lang/Boolean;"),
            member(PSF, "FALSE", "Ljava/lang/Boolean;"),
        ],
        methods: &[
            member(P, "booleanValue", "()Z"),
            member(PS, "valueOf", "(Z)Ljava/lang/Boolean;"),
            member(PS, "parseBoolean", "(Ljava/lang/String;)Z"),
            member(P, "compareTo", "(Ljava/lang/Boolean;)I"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Character",
        flags: FINAL_CLASS,
        super_class: Some(OBJECT),
        interfaces: &["java/io/Serializable", "java/lang/Comparable"],
        signature: Some("Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/lang/Character;>;"),
        fields: &[],
        methods: &[
            member(P, "charValue", "()C"),
            member(PS, "valueOf", "(C)Ljava/lang/Character;"),
            member(PS, "isDigit", "(C)Z"),
            member(P, "compareTo", "(Ljava/lang/Character;)I"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Byte",
        flags: FINAL_CLASS,
        super_class: Some("java/lang/Number"),
        interfaces: &["java/lang/Comparable"],
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Byte;>;"),
        fields: &[],
        methods: &[
            member(P, "intValue", "()I"),
            member(P, "longValue", "()J"),
            member(P, "floatValue", "()F"),
            member(P, "doubleValue", "()D"),
            member(PS, "valueOf", "(B)Ljava/lang/Byte;"),
            member(P, "compareTo", "(Ljava/lang/Byte;)I"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Short",
        flags: FINAL_CLASS,
        super_class: Some("java/lang/Number"),
        interfaces: &["java/lang/Comparable"],
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Short;>;"),
        fields: &[],
        methods: &[
            member(P, "intValue", "()I"),
            member(P, "longValue", "()J"),
            member(P, "floatValue", "()F"),
            member(P, "doubleValue", "()D"),
            member(PS, "valueOf", "(S)Ljava/lang/Short;"),
            member(P, "compareTo", "(Ljava/lang/Short;)I"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Integer",
        flags: FINAL_CLASS,
        super_class: Some("java/lang/Number"),
        interfaces: &["java/lang/Comparable"],
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Integer;>;"),
        fields: &[member(PSF, "MAX_VALUE", "I"), member(PSF, "MIN_VALUE", "I")],
        methods: &[
            member(P, "<init>", "(I)V"),
            member(P, "intValue", "()I"),
            member(P, "longValue", "()J"),
            member(P, "floatValue", "()F"),
            member(P, "doubleValue", "()D"),
            member(PS, "valueOf", "(I)Ljava/lang/Integer;"),
            member(PS, "valueOf", "(Ljava/lang/String;)Ljava/lang/Integer;"),
            member(PS, "parseInt", "(Ljava/lang/String;)I"),
            member(PS, "toString", "(I)Ljava/lang/String;"),
            member(P, "toString", "()Ljava/lang/String;"),
            member(P, "compareTo", "(Ljava/lang/Integer;)I"),
            member(BRIDGE, "compareTo", "(Ljava/lang/Object;)I"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Long",
        flags: FINAL_CLASS,
        super_class: Some("java/lang/Number"),
        interfaces: &["java/lang/Comparable"],
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Long;>;"),
        fields: &[member(PSF, "MAX_VALUE", "J"), member(PSF, "MIN_VALUE", "J")],
        methods: &[
            member(P, "intValue", "()I"),
            member(P, "longValue", "()J"),
            member(P, "floatValue", "()F"),
            member(P, "doubleValue", "()D"),
            member(PS, "valueOf", "(J)Ljava/lang/Long;"),
            member(PS, "parseLong", "(Ljava/lang/String;)J"),
            member(P, "compareTo", "(Ljava/lang/Long;)I"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Float",
        flags: FINAL_CLASS,
        super_class: Some("java/lang/Number"),
        interfaces: &["java/lang/Comparable"],
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Float;>;"),
        fields: &[],
        methods: &[
            member(P, "intValue", "()I"),
            member(P, "longValue", "()J"),
            member(P, "floatValue", "()F"),
            member(P, "doubleValue", "()D"),
            member(PS, "valueOf", "(F)Ljava/lang/Float;"),
            member(P, "compareTo", "(Ljava/lang/Float;)I"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Double",
        flags: FINAL_CLASS,
        super_class: Some("java/lang/Number"),
        interfaces: &["java/lang/Comparable"],
        signature: Some("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Double;>;"),
        fields: &[],
        methods: &[
            member(P, "intValue", "()I"),
            member(P, "longValue", "()J"),
            member(P, "floatValue", "()F"),
            member(P, "doubleValue", "()D"),
            member(PS, "valueOf", "(D)Ljava/lang/Double;"),
            member(PS, "parseDouble", "(Ljava/lang/String;)D"),
            member(P, "compareTo", "(Ljava/lang/Double;)I"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Enum",
        flags: ABSTRACT_CLASS,
        super_class: Some(OBJECT),
        interfaces: &["java/lang/Comparable", "java/io/Serializable"],
        signature: Some(
            "<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;Ljava/io/Serializable;",
        ),
        fields: &[],
        methods: &[
            member(ACC_PUBLIC | ACC_FINAL, "name", "()Ljava/lang/String;"),
            member(ACC_PUBLIC | ACC_FINAL, "ordinal", "()I"),
            generic(ACC_PUBLIC | ACC_FINAL, "compareTo", "(Ljava/lang/Enum;)I", "(TE;)I"),
            generic(
                PS,
                "valueOf",
                "(Ljava/lang/Class;Ljava/lang/String;)Ljava/lang/Enum;",
                "<T:Ljava/lang/Enum<TT;>;>(Ljava/lang/Class<TT;>;Ljava/lang/String;)TT;",
            ),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/Math",
        flags: FINAL_CLASS,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: None,
        fields: &[member(PSF, "PI", "D"), member(PSF, "E", "D")],
        methods: &[
            member(PS, "max", "(II)I"),
            member(PS, "max", "(JJ)J"),
            member(PS, "max", "(FF)F"),
            member(PS, "max", "(DD)D"),
            member(PS, "abs", "(I)I"),
            member(PS, "abs", "(D)D"),
            member(PS, "sqrt", "(D)D"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/lang/System",
        flags: FINAL_CLASS,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: None,
        fields: &[
            member(PSF, "out", "Ljava/io/PrintStream;"),
            member(PSF, "err", "Ljava/io/PrintStream;"),
        ],
        methods: &[
            member(PS, "currentTimeMillis", "()J"),
            member(PS, "getProperty", "(Ljava/lang/String;)Ljava/lang/String;"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/io/PrintStream",
        flags: CLASS,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: None,
        fields: &[],
        methods: &[
            member(P, "println", "()V"),
            member(P, "println", "(Z)V"),
            member(P, "println", "(C)V"),
            member(P, "println", "(I)V"),
            member(P, "println", "(J)V"),
            member(P, "println", "(F)V"),
            member(P, "println", "(D)V"),
            member(P, "println", "([C)V"),
            member(P, "println", "(Ljava/lang/String;)V"),
            member(P, "println", "(Ljava/lang/Object;)V"),
            member(P, "print", "(Ljava/lang/String;)V"),
            member(PV, "printf", "(Ljava/lang/String;[Ljava/lang/Object;)Ljava/io/PrintStream;"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/util/Iterator",
        flags: INTERFACE,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: Some("<E:Ljava/lang/Object;>Ljava/lang/Object;"),
        fields: &[],
        methods: &[
            member(PA, "hasNext", "()Z"),
            generic(PA, "next", "()Ljava/lang/Object;", "()TE;"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/util/Collection",
        flags: INTERFACE,
        super_class: Some(OBJECT),
        interfaces: &["java/lang/Iterable"],
        signature: Some("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Iterable<TE;>;"),
        fields: &[],
        methods: &[
            member(PA, "size", "()I"),
            member(PA, "isEmpty", "()Z"),
            member(PA, "contains", "(Ljava/lang/Object;)Z"),
            generic(PA, "add", "(Ljava/lang/Object;)Z", "(TE;)Z"),
            generic(PA, "addAll", "(Ljava/util/Collection;)Z", "(Ljava/util/Collection<+TE;>;)Z"),
            member(PA, "remove", "(Ljava/lang/Object;)Z"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/util/List",
        flags: INTERFACE,
        super_class: Some(OBJECT),
        interfaces: &["java/util/Collection"],
        signature: Some("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;"),
        fields: &[],
        methods: &[
            generic(PA, "get", "(I)Ljava/lang/Object;", "(I)TE;"),
            generic(PA, "set", "(ILjava/lang/Object;)Ljava/lang/Object;", "(ITE;)TE;"),
            generic(PA, "add", "(ILjava/lang/Object;)V", "(ITE;)V"),
            generic(PA, "remove", "(I)Ljava/lang/Object;", "(I)TE;"),
            member(PA, "indexOf", "(Ljava/lang/Object;)I"),
            generic(
                PSV,
                "of",
                "([Ljava/lang/Object;)Ljava/util/List;",
                "<E:Ljava/lang/Object;>([TE;)Ljava/util/List<TE;>;",
            ),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/util/Set",
        flags: INTERFACE,
        super_class: Some(OBJECT),
        interfaces: &["java/util/Collection"],
        signature: Some("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;"),
        fields: &[],
        methods: &[],
        inner_classes: &[],
    },
    Class {
        name: "java/util/AbstractCollection",
        flags: ABSTRACT_CLASS,
        super_class: Some(OBJECT),
        interfaces: &["java/util/Collection"],
        signature: Some("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;"),
        fields: &[],
        methods: &[
            member(ACC_ABSTRACT | ACC_PUBLIC, "size", "()I"),
            member(P, "toString", "()Ljava/lang/String;"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/util/AbstractList",
        flags: ABSTRACT_CLASS,
        super_class: Some("java/util/AbstractCollection"),
        interfaces: &["java/util/List"],
        signature: Some(
            "<E:Ljava/lang/Object;>Ljava/util/AbstractCollection<TE;>;Ljava/util/List<TE;>;",
        ),
        fields: &[],
        methods: &[generic(PA, "get", "(I)Ljava/lang/Object;", "(I)TE;")],
        inner_classes: &[],
    },
    Class {
        name: "java/util/ArrayList",
        flags: CLASS,
        super_class: Some("java/util/AbstractList"),
        interfaces: &["java/util/List", "java/lang/Cloneable", "java/io/Serializable"],
        signature: Some(
            "<E:Ljava/lang/Object;>Ljava/util/AbstractList<TE;>;Ljava/util/List<TE;>;Ljava/lang/Cloneable;Ljava/io/Serializable;",
        ),
        fields: &[],
        methods: &[
            member(P, "<init>", "()V"),
            member(P, "<init>", "(I)V"),
            generic(P, "<init>", "(Ljava/util/Collection;)V", "(Ljava/util/Collection<+TE;>;)V"),
            generic(P, "get", "(I)Ljava/lang/Object;", "(I)TE;"),
            generic(P, "add", "(Ljava/lang/Object;)Z", "(TE;)Z"),
            member(P, "size", "()I"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/util/Map",
        flags: INTERFACE,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: Some("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;"),
        fields: &[],
        methods: &[
            member(PA, "size", "()I"),
            member(PA, "containsKey", "(Ljava/lang/Object;)Z"),
            generic(PA, "get", "(Ljava/lang/Object;)Ljava/lang/Object;", "(Ljava/lang/Object;)TV;"),
            generic(PA, "put", "(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/Object;", "(TK;TV;)TV;"),
            generic(PA, "keySet", "()Ljava/util/Set;", "()Ljava/util/Set<TK;>;"),
            generic(
                PA,
                "entrySet",
                "()Ljava/util/Set;",
                "()Ljava/util/Set<Ljava/util/Map$Entry<TK;TV;>;>;",
            ),
        ],
        inner_classes: &[MAP_ENTRY],
    },
    Class {
        name: "java/util/Map$Entry",
        flags: INTERFACE,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: Some("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;"),
        fields: &[],
        methods: &[
            generic(PA, "getKey", "()Ljava/lang/Object;", "()TK;"),
            generic(PA, "getValue", "()Ljava/lang/Object;", "()TV;"),
            generic(PA, "setValue", "(Ljava/lang/Object;)Ljava/lang/Object;", "(TV;)TV;"),
        ],
        inner_classes: &[MAP_ENTRY],
    },
    Class {
        name: "java/util/AbstractMap",
        flags: ABSTRACT_CLASS,
        super_class: Some(OBJECT),
        interfaces: &["java/util/Map"],
        signature: Some(
            "<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Map<TK;TV;>;",
        ),
        fields: &[],
        methods: &[],
        inner_classes: &[MAP_ENTRY],
    },
    Class {
        name: "java/util/HashMap",
        flags: CLASS,
        super_class: Some("java/util/AbstractMap"),
        interfaces: &["java/util/Map", "java/lang/Cloneable", "java/io/Serializable"],
        signature: Some(
            "<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/util/AbstractMap<TK;TV;>;Ljava/util/Map<TK;TV;>;Ljava/lang/Cloneable;Ljava/io/Serializable;",
        ),
        fields: &[],
        methods: &[
            member(P, "<init>", "()V"),
            member(P, "<init>", "(I)V"),
            generic(P, "<init>", "(Ljava/util/Map;)V", "(Ljava/util/Map<+TK;+TV;>;)V"),
            generic(P, "get", "(Ljava/lang/Object;)Ljava/lang/Object;", "(Ljava/lang/Object;)TV;"),
            generic(P, "put", "(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/Object;", "(TK;TV;)TV;"),
        ],
        inner_classes: &[MAP_ENTRY],
    },
    Class {
        name: "java/util/Objects",
        flags: FINAL_CLASS,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: None,
        fields: &[],
        methods: &[
            member(PS, "equals", "(Ljava/lang/Object;Ljava/lang/Object;)Z"),
            member(PSV, "hash", "([Ljava/lang/Object;)I"),
            member(PS, "toString", "(Ljava/lang/Object;)Ljava/lang/String;"),
            generic(PS, "requireNonNull", "(Ljava/lang/Object;)Ljava/lang/Object;", "<T:Ljava/lang/Object;>(TT;)TT;"),
        ],
        inner_classes: &[],
    },
    Class {
        name: "java/util/Arrays",
        flags: CLASS,
        super_class: Some(OBJECT),
        interfaces: &[],
        signature: None,
        fields: &[],
        methods: &[
            generic(
                PSV,
                "asList",
                "([Ljava/lang/Object;)Ljava/util/List;",
                "<T:Ljava/lang/Object;>([TT;)Ljava/util/List<TT;>;",
            ),
            member(PS, "toString", "([I)Ljava/lang/String;"),
            member(PS, "toString", "([Ljava/lang/Object;)Ljava/lang/String;"),
        ],
        inner_classes: &[],
    },
];

impl Class {
    fn stub(&self) -> javasym_classfile::Result<ClassStub> {
        let fields = self
            .fields
            .iter()
            .map(|f| {
                Ok(FieldStub {
                    access_flags: f.flags,
                    name: f.name.to_string(),
                    descriptor: parse_field_descriptor(f.descriptor)?,
                    signature: f.signature.map(parse_field_signature).transpose()?,
                })
            })
            .collect::<javasym_classfile::Result<Vec<_>>>()?;
        let methods = self
            .methods
            .iter()
            .map(|m| {
                Ok(MethodStub {
                    access_flags: m.flags,
                    name: m.name.to_string(),
                    descriptor: parse_method_descriptor(m.descriptor)?,
                    signature: m.signature.map(parse_method_signature).transpose()?,
                })
            })
            .collect::<javasym_classfile::Result<Vec<_>>>()?;
        let inner_classes = self
            .inner_classes
            .iter()
            .map(|(inner, outer, name, flags)| InnerClassInfo {
                inner_class: inner.to_string(),
                outer_class: Some(outer.to_string()),
                inner_name: Some(name.to_string()),
                access_flags: *flags,
            })
            .collect();
        Ok(ClassStub {
            internal_name: self.name.to_string(),
            access_flags: self.flags,
            super_class: self.super_class.map(str::to_string),
            interfaces: self.interfaces.iter().map(|i| i.to_string()).collect(),
            signature: self.signature.map(parse_class_signature).transpose()?,
            inner_classes,
            fields,
            methods,
        })
    }
}

/// Loader over the built-in class table.
#[derive(Debug)]
pub struct BuiltinClassLoader {
    by_binary_name: HashMap<String, usize>,
}

impl BuiltinClassLoader {
    pub fn new() -> Self {
        let by_binary_name = CLASSES
            .iter()
            .enumerate()
            .map(|(index, class)| (class.name.replace('/', "."), index))
            .collect();
        Self { by_binary_name }
    }

    /// Binary names of every class in the table, sorted.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_binary_name.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for BuiltinClassLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassLoader for BuiltinClassLoader {
    fn load_class(&self, binary_name: &str) -> Option<ClassStub> {
        let class = &CLASSES[*self.by_binary_name.get(binary_name)?];
        match class.stub() {
            Ok(stub) => Some(stub),
            Err(err) => {
                tracing::warn!(
                    target: "javasym.solver",
                    class = class.name,
                    error = %err,
                    "malformed built-in class description"
                );
                None
            }
        }
    }
}
